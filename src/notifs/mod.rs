pub mod manager;
pub mod notifier;
pub mod sync;

pub use manager::MessagesNotificationManager;
pub use notifier::{DesktopNotifier, Notifier};
pub use sync::{CheckUnreadMessagesJob, JobOutcome};
