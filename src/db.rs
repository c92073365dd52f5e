// 🗄️ SQLite Store - Family networks persisted as JSON snapshots
//
// One row per network. The whole network (members + edge lists) is written
// as a single JSON document, so a reader can never see half of a
// reciprocal edge pair.

use crate::error::{FamilyError, Result};
use crate::network::{FamilyNetwork, NetworkSummary};
use crate::store::NetworkStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS networks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            member_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            snapshot TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_networks_created_at ON networks(created_at)",
        [],
    )?;

    Ok(())
}

/// Number of stored networks
pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM networks", [], |row| row.get(0))?;
    Ok(count)
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        setup_database(&conn)?;
        debug!(path = %path.as_ref().display(), "opened sqlite store");
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FamilyError::Poisoned(e.to_string()))
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        verify_count(&conn)
    }
}

impl NetworkStore for SqliteStore {
    fn get_network(&self, id: &str) -> Result<Option<FamilyNetwork>> {
        let conn = self.lock()?;

        let snapshot: Option<String> = conn
            .query_row(
                "SELECT snapshot FROM networks WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match snapshot {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_network(&self, network: &FamilyNetwork) -> Result<()> {
        let snapshot = serde_json::to_string(network)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO networks (id, name, member_count, created_at, updated_at, snapshot)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                member_count = excluded.member_count,
                updated_at = excluded.updated_at,
                snapshot = excluded.snapshot",
            params![
                network.id,
                network.name,
                network.member_count() as i64,
                network.created_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
                snapshot,
            ],
        )?;

        Ok(())
    }

    fn list_networks(&self) -> Result<Vec<NetworkSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, member_count, created_at FROM networks ORDER BY created_at, id",
        )?;

        let rows = stmt.query_map([], |row| {
            let created_at: String = row.get(3)?;
            let member_count: i64 = row.get(2)?;
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, member_count, created_at))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, name, member_count, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    FamilyError::InvalidInput(format!("bad created_at for {}: {}", id, e))
                })?;

            summaries.push(NetworkSummary {
                id,
                name,
                member_count: member_count as usize,
                created_at,
            });
        }

        Ok(summaries)
    }
}
