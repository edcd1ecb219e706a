use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::gateway::{Gateway, Session};

/// The signed-in session, shared explicitly with whoever needs it.
///
/// Starts empty, is filled on sign-in and cleared on sign-out.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn begin(&self, session: Session) {
        info!(user = %session.user.id, "session started");
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn end(&self) -> Option<Session> {
        let previous = self.inner.write().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(session) = &previous {
            info!(user = %session.user.id, "session ended");
        }
        previous
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub session: SessionContext,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, session: SessionContext) -> Self {
        Self { gateway, session }
    }
}
