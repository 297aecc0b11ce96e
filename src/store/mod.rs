pub mod sqlite;

use std::collections::HashSet;

use crate::app::Result;
use crate::domain::{Message, UnreadSnapshot};

pub use sqlite::SqliteStore;

/// Key for the "unread messages view is currently on screen" preference.
/// Set by the embedding UI, read by the sync job to decide whether
/// notifications should be raised at all.
pub const PREF_UNREAD_FOLDER_ACTIVE: &str = "unread_folder_active";

pub trait Store {
    // Unread snapshot
    fn unread_messages(&self) -> Result<UnreadSnapshot>;
    fn replace_unread(&self, messages: &[Message]) -> Result<()>;

    // Notification bookkeeping: ids of messages currently shown
    fn shown_message_ids(&self) -> Result<HashSet<String>>;
    fn mark_shown(&self, ids: &[String]) -> Result<()>;
    fn clear_shown(&self, ids: &[String]) -> Result<()>;
    fn clear_all_shown(&self) -> Result<()>;

    // Preferences
    fn set_flag(&self, key: &str, value: bool) -> Result<()>;
    fn get_flag(&self, key: &str) -> Result<bool>;
}
