use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Transient message holder with timed auto-dismiss.
///
/// Each `show` bumps a generation and cancels the previous expiry timer;
/// an expiry only clears the slot when its generation is still current,
/// so an old timer can never hide a newer message.
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            ttl,
        }
    }

    fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let mut slot = Self::lock(&self.slot);
        slot.generation += 1;
        let generation = slot.generation;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.current = Some(Notification {
            message: message.into(),
            severity,
        });

        let shared = Arc::clone(&self.slot);
        let ttl = self.ttl;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = Self::lock(&shared);
            if slot.generation == generation {
                slot.current = None;
                slot.timer = None;
            }
        }));
        generation
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Error)
    }

    pub fn current(&self) -> Option<Notification> {
        Self::lock(&self.slot).current.clone()
    }

    pub fn dismiss(&self) {
        let mut slot = Self::lock(&self.slot);
        slot.generation += 1;
        slot.current = None;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let notifier = Notifier::default();
        notifier.success("Saved");
        assert_eq!(notifier.current().map(|n| n.severity), Some(Severity::Success));

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(notifier.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_clear_newer_message() {
        let notifier = Notifier::default();
        notifier.success("first");
        tokio::time::sleep(Duration::from_secs(2)).await;
        notifier.error("second");

        // the first message's deadline passes
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let current = notifier.current().expect("second still visible");
        assert_eq!(current.message, "second");
        assert_eq!(current.severity, Severity::Error);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test]
    async fn test_dismiss_clears_immediately() {
        let notifier = Notifier::default();
        let first = notifier.error("boom");
        notifier.dismiss();
        assert!(notifier.current().is_none());
        assert!(notifier.success("again") > first);
    }
}
