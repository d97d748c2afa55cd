use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StorageError;
use crate::persistence::{PersistenceAdapter, Snapshot};

/// Event for the audit trail: every snapshot write or wipe leaves one row
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(event_type: &str, data: serde_json::Value) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            data,
        }
    }
}

pub fn setup_database(conn: &Connection) -> Result<(), StorageError> {
    // WAL keeps the previous snapshot readable if a write is interrupted.
    // In-memory databases answer "memory" here, which is fine.
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Snapshots Table (one row per entity type, rewritten on every save)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            entity_type TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            saved_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )?;

    Ok(())
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<(), StorageError> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (event_id, timestamp, event_type, data) VALUES (?1, ?2, ?3, ?4)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            data_json,
        ],
    )?;

    Ok(())
}

/// Most recent events first
pub fn get_recent_events(conn: &Connection, limit: usize) -> Result<Vec<Event>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, data
         FROM events
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let events = stmt
        .query_map(params![limit as i64], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(3)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                data: serde_json::from_str(&data_json)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

/// SQLite-backed snapshot storage
pub struct SqliteAdapter {
    conn: Connection,
}

impl SqliteAdapter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        setup_database(&conn)?;
        Ok(SqliteAdapter { conn })
    }

    pub fn recent_events(&self, limit: usize) -> Result<Vec<Event>, StorageError> {
        get_recent_events(&self.conn, limit)
    }

    pub fn saved_entity_types(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl PersistenceAdapter for SqliteAdapter {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT entity_type, data FROM snapshots")?;

        let rows = stmt
            .query_map([], |row| {
                let key: String = row.get(0)?;
                let data: String = row.get(1)?;
                Ok((key, data))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut entries = Vec::with_capacity(rows.len());
        for (key, data) in rows {
            entries.push((key, serde_json::from_str(&data)?));
        }

        Ok(Some(Snapshot::from_entries(entries)?))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let saved_at = Utc::now().to_rfc3339();
        let entries = snapshot.to_entries()?;

        // All keys land together or not at all
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in &entries {
            tx.execute(
                "INSERT INTO snapshots (entity_type, data, saved_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(entity_type) DO UPDATE SET data = excluded.data, saved_at = excluded.saved_at",
                params![key, serde_json::to_string(value)?, saved_at],
            )?;
        }

        let event = Event::new(
            "snapshot_saved",
            serde_json::json!({
                "guests": snapshot.guests.len(),
                "budget_items": snapshot.budget_items.len(),
                "vendors": snapshot.vendors.len(),
                "tasks": snapshot.tasks.len(),
                "tables": snapshot.tables.len(),
            }),
        );
        insert_event(&tx, &event)?;

        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM snapshots", [])?;
        insert_event(
            &tx,
            &Event::new("snapshot_cleared", serde_json::json!({ "rows": removed })),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        match self.conn.path() {
            Some(path) if !path.is_empty() => format!("sqlite:{}", path),
            _ => "sqlite::memory:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Draft, NewBudgetItem, NewGuest, NewTable, Rsvp};

    fn create_test_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        for (i, name) in ["David Cohen", "Rachel Levi", "Yossi Goldberg"].iter().enumerate() {
            snapshot.guests.push(
                NewGuest::named(*name)
                    .confirmed(Rsvp::Yes)
                    .into_entity(format!("g{}", i)),
            );
        }
        snapshot.budget_items.push(
            NewBudgetItem::new("hall", "Hall down payment", 20000.0)
                .deposit(10000.0)
                .into_entity("b1".to_string()),
        );
        let mut table = NewTable::new("Family 1", 10).into_entity("t1".to_string());
        table.guest_ids = vec!["g2".to_string(), "g0".to_string()];
        snapshot.tables.push(table);
        snapshot.categories.budget.insert("hall");
        snapshot.settings.total_budget = 100000.0;
        snapshot
    }

    #[test]
    fn test_empty_database_loads_none() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        assert!(adapter.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let snapshot = create_test_snapshot();

        adapter.save(&snapshot).unwrap();
        let loaded = adapter.load().unwrap().unwrap();

        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.guests[1].full_name, "Rachel Levi");
        assert_eq!(loaded.tables[0].guest_ids, vec!["g2", "g0"]);
    }

    #[test]
    fn test_save_twice_overwrites_rows() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let mut snapshot = create_test_snapshot();

        adapter.save(&snapshot).unwrap();
        let rows_after_first = adapter.saved_entity_types().unwrap();

        snapshot.guests.pop();
        adapter.save(&snapshot).unwrap();

        assert_eq!(adapter.saved_entity_types().unwrap(), rows_after_first);
        assert_eq!(adapter.load().unwrap().unwrap().guests.len(), 2);
    }

    #[test]
    fn test_clear_removes_snapshot_and_logs_event() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        adapter.save(&create_test_snapshot()).unwrap();

        adapter.clear().unwrap();

        assert!(adapter.load().unwrap().is_none());
        let events = adapter.recent_events(10).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "snapshot_cleared");
        assert_eq!(events[1].event_type, "snapshot_saved");
        assert_eq!(events[1].data["guests"], 3);
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");

        SqliteAdapter::open(&path)
            .unwrap()
            .save(&create_test_snapshot())
            .unwrap();

        let reopened = SqliteAdapter::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(create_test_snapshot()));
        assert!(reopened.describe().starts_with("sqlite:"));
    }

    #[test]
    fn test_event_log() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let event = Event::new("test_event", serde_json::json!({"test": "data"}));
        insert_event(&conn, &event).unwrap();

        let events = get_recent_events(&conn, 5).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, event.event_id);
        assert_eq!(events[0].data["test"], "data");
    }
}
