use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, SnooError};
use crate::domain::Message;
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| SnooError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            SnooError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }
}

impl Store for SqliteStore {
    fn unread_messages(&self) -> Result<Vec<Message>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, author, subject, body, created_at, fetched_at
             FROM unread_messages ORDER BY position",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Message {
                id: row.get(0)?,
                author: row.get(1)?,
                subject: row.get(2)?,
                body: row.get(3)?,
                created_at: row
                    .get::<_, Option<String>>(4)?
                    .and_then(|s| Self::parse_datetime(&s)),
                fetched_at: row
                    .get::<_, String>(5)
                    .ok()
                    .and_then(|s| Self::parse_datetime(&s))
                    .unwrap_or_else(Utc::now),
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    fn replace_unread(&self, messages: &[Message]) -> Result<()> {
        let mut conn = self.lock()?;

        // Snapshot replacement is atomic: readers see either the old set
        // or the new one, never a mix.
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM unread_messages", [])?;
        for (position, message) in messages.iter().enumerate() {
            tx.execute(
                "INSERT INTO unread_messages (id, position, author, subject, body, created_at, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    message.id,
                    position as i64,
                    message.author,
                    message.subject,
                    message.body,
                    message.created_at.map(|dt| dt.to_rfc3339()),
                    message.fetched_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn shown_message_ids(&self) -> Result<HashSet<String>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT message_id FROM shown_notifications")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = HashSet::new();
        for row in rows {
            ids.insert(row?);
        }
        Ok(ids)
    }

    fn mark_shown(&self, ids: &[String]) -> Result<()> {
        let mut conn = self.lock()?;

        let tx = conn.transaction()?;
        for id in ids {
            tx.execute(
                "INSERT OR REPLACE INTO shown_notifications (message_id, shown_at) VALUES (?1, ?2)",
                params![id, Utc::now().to_rfc3339()],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn clear_shown(&self, ids: &[String]) -> Result<()> {
        let mut conn = self.lock()?;

        let tx = conn.transaction()?;
        for id in ids {
            tx.execute(
                "DELETE FROM shown_notifications WHERE message_id = ?1",
                params![id],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn clear_all_shown(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM shown_notifications", [])?;
        Ok(())
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2)",
            params![key, if value { "true" } else { "false" }],
        )?;
        Ok(())
    }

    fn get_flag(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;

        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM prefs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.as_deref() == Some("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;

    fn msg(id: &str) -> Message {
        Message::new(id, format!("subject {id}"), "body")
    }

    #[test]
    fn test_replace_unread_replaces_atomically() {
        let store = SqliteStore::in_memory().unwrap();

        store.replace_unread(&[msg("t4_1"), msg("t4_2")]).unwrap();
        assert_eq!(store.unread_messages().unwrap().len(), 2);

        store.replace_unread(&[msg("t4_3")]).unwrap();
        let unread = store.unread_messages().unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, "t4_3");
    }

    #[test]
    fn test_unread_preserves_order() {
        let store = SqliteStore::in_memory().unwrap();

        store
            .replace_unread(&[msg("t4_z"), msg("t4_a"), msg("t4_m")])
            .unwrap();

        let ids: Vec<String> = store
            .unread_messages()
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["t4_z", "t4_a", "t4_m"]);
    }

    #[test]
    fn test_shown_bookkeeping() {
        let store = SqliteStore::in_memory().unwrap();

        store
            .mark_shown(&["t4_1".to_string(), "t4_2".to_string()])
            .unwrap();
        assert_eq!(store.shown_message_ids().unwrap().len(), 2);

        store.clear_shown(&["t4_1".to_string()]).unwrap();
        let ids = store.shown_message_ids().unwrap();
        assert!(!ids.contains("t4_1"));
        assert!(ids.contains("t4_2"));

        store.clear_all_shown().unwrap();
        assert!(store.shown_message_ids().unwrap().is_empty());
    }

    #[test]
    fn test_mark_shown_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();

        store.mark_shown(&["t4_1".to_string()]).unwrap();
        store.mark_shown(&["t4_1".to_string()]).unwrap();
        assert_eq!(store.shown_message_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_flags_default_to_false() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(!store.get_flag("missing").unwrap());

        store.set_flag("missing", true).unwrap();
        assert!(store.get_flag("missing").unwrap());

        store.set_flag("missing", false).unwrap();
        assert!(!store.get_flag("missing").unwrap());
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snoowatch.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.replace_unread(&[msg("t4_1")]).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.unread_messages().unwrap().len(), 1);
    }
}
