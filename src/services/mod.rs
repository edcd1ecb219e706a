pub mod dashboard;
pub mod list_editor;
pub mod notifier;

pub use dashboard::{Dashboard, Previews, Summary};
pub use list_editor::{Confirm, ListEditor, LoadTicket, Outcome, fetch_all};
pub use notifier::{Notification, Notifier, Severity};
