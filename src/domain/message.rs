use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unread inbox message. Identity is the Reddit fullname (`t4_...` for
/// private messages, `t1_...` for comment replies); two messages with the
/// same id are the same message regardless of body edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: Option<String>,
    pub subject: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: None,
            subject: subject.into(),
            body: body.into(),
            created_at: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or("reddit")
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message {}

/// The currently-known unread state: an ordered sequence of messages,
/// replaced wholesale after each successful refresh.
pub type UnreadSnapshot = Vec<Message>;

/// Messages present in `old` but absent from `new`, by identity.
/// Order of `old` is preserved. These are the messages whose notifications
/// are no longer valid and must be dismissed.
pub fn stale_messages(old: &[Message], new: &[Message]) -> Vec<Message> {
    old.iter()
        .filter(|m| !new.iter().any(|n| n.id == m.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str) -> Message {
        Message::new(id, format!("subject {id}"), "body")
    }

    #[test]
    fn test_equality_is_by_identity() {
        let a = Message::new("t4_1", "hello", "one body");
        let b = Message::new("t4_1", "hello (edited)", "another body");
        assert_eq!(a, b);
    }

    #[test]
    fn test_stale_is_set_difference() {
        let old = vec![msg("t4_1"), msg("t4_2"), msg("t4_3")];
        let new = vec![msg("t4_2")];

        let stale = stale_messages(&old, &new);
        let ids: Vec<&str> = stale.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["t4_1", "t4_3"]);
    }

    #[test]
    fn test_stale_empty_when_nothing_removed() {
        let old = vec![msg("t4_1")];
        let new = vec![msg("t4_1"), msg("t4_2")];
        assert!(stale_messages(&old, &new).is_empty());
    }

    #[test]
    fn test_stale_everything_when_new_is_empty() {
        let old = vec![msg("t4_1"), msg("t4_2")];
        let stale = stale_messages(&old, &[]);
        assert_eq!(stale.len(), 2);
    }

    #[test]
    fn test_stale_preserves_old_order() {
        let old = vec![msg("t4_9"), msg("t4_1"), msg("t4_5")];
        let stale = stale_messages(&old, &[]);
        let ids: Vec<&str> = stale.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["t4_9", "t4_1", "t4_5"]);
    }
}
