use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::gateway::{Gateway, Query};
use crate::models::{Draft, Entity, RecordId};
use crate::services::notifier::Notifier;

/// Result of a user action on a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote store accepted the change.
    Done,
    /// Rejected before any request was sent.
    Invalid,
    /// The remote store returned an error.
    Failed,
    /// The user declined the confirmation prompt.
    Declined,
}

/// Blocking yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Identifies one `load` so a slower, older response can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Fetches a whole table, newest first, decoded into `E`.
pub async fn fetch_all<E: Entity>(gateway: &dyn Gateway) -> Result<Vec<E>, AppError> {
    let rows = gateway
        .select(E::TABLE, &Query::columns(E::SELECT).newest_first())
        .await?;
    rows.into_iter()
        .map(|row| serde_json::from_value::<E>(row).map_err(AppError::from))
        .collect()
}

/// List + form + inline edit + delete over one remote table.
pub struct ListEditor<E: Entity> {
    gateway: Arc<dyn Gateway>,
    notifier: Notifier,
    items: Vec<E>,
    form: E::Draft,
    editing_id: Option<RecordId>,
    loading: bool,
    load_generation: u64,
    scroll_requested: bool,
}

impl<E: Entity> ListEditor<E> {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            items: Vec::new(),
            form: E::Draft::default(),
            editing_id: None,
            loading: false,
            load_generation: 0,
            scroll_requested: false,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn form(&self) -> &E::Draft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut E::Draft {
        &mut self.form
    }

    pub fn set_form(&mut self, draft: E::Draft) {
        self.form = draft;
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        self.editing_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Returns true once after `begin_edit`, so the view can jump to the form.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.loading = true;
        LoadTicket(self.load_generation)
    }

    /// Applies a fetch result. Responses for superseded tickets are
    /// discarded; failures keep the previous items visible.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<E>, AppError>) -> bool {
        if ticket.0 != self.load_generation {
            debug!(table = E::TABLE, "discarding stale load response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(err) => {
                warn!(table = E::TABLE, "load failed: {}", err);
                self.notifier.error(format!("Failed to load {}.", E::PLURAL));
                false
            }
        }
    }

    pub async fn load(&mut self) -> bool {
        let ticket = self.begin_load();
        let result = fetch_all::<E>(self.gateway.as_ref()).await;
        self.finish_load(ticket, result)
    }

    fn duplicate_exists(&self) -> bool {
        self.items
            .iter()
            .filter(|item| Some(item.id()) != self.editing_id)
            .any(|item| item.conflicts_with(&self.form))
    }

    /// Inserts the form, or updates the record being edited.
    pub async fn submit(&mut self) -> Outcome {
        if let Err(err) = self.form.validate() {
            self.notifier.error(err.to_string());
            return Outcome::Invalid;
        }
        if self.duplicate_exists() {
            self.notifier.error(E::DUPLICATE_MESSAGE);
            return Outcome::Invalid;
        }
        let payload = match serde_json::to_value(&self.form) {
            Ok(value) => value,
            Err(err) => {
                self.notifier.error(err.to_string());
                return Outcome::Invalid;
            }
        };

        let (result, message) = match self.editing_id {
            Some(id) => (
                self.gateway.update(E::TABLE, payload, id).await,
                format!("{} updated successfully!", E::NOUN),
            ),
            None => (
                self.gateway.insert(E::TABLE, payload).await,
                format!("{} added successfully!", E::NOUN),
            ),
        };

        match result {
            Ok(()) => {
                self.editing_id = None;
                self.form = E::Draft::default();
                self.notifier.success(message);
                self.load().await;
                Outcome::Done
            }
            Err(err) => {
                self.notifier.error(err.to_string());
                Outcome::Failed
            }
        }
    }

    pub fn begin_edit(&mut self, entity: &E) {
        self.form = entity.to_draft();
        self.editing_id = Some(entity.id());
        self.scroll_requested = true;
    }

    /// Starts editing the loaded record with `id`; false if it is not listed.
    pub fn begin_edit_by_id(&mut self, id: RecordId) -> bool {
        match self.items.iter().find(|item| item.id() == id).cloned() {
            Some(entity) => {
                self.begin_edit(&entity);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
        self.form = E::Draft::default();
    }

    pub async fn remove(&mut self, id: RecordId, confirm: &dyn Confirm) -> Outcome {
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", E::NOUN.to_lowercase())) {
            return Outcome::Declined;
        }
        match self.gateway.delete(E::TABLE, id).await {
            Ok(()) => {
                self.items.retain(|item| item.id() != id);
                self.notifier.success(format!("{} deleted.", E::NOUN));
                Outcome::Done
            }
            Err(err) => {
                self.notifier.error(err.to_string());
                Outcome::Failed
            }
        }
    }
}

/// Display text of one form field.
pub fn draft_field<D: Draft>(draft: &D, field: &str) -> String {
    match serde_json::to_value(draft).ok().and_then(|v| v.get(field).cloned()) {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
