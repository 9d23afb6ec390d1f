use crate::models::metrics::PerformanceHistory;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;

const DB_SCHEMA_VERSION: i64 = 1;

/// Slot holding the full performance-analysis history as a JSON array.
pub const PERFORMANCE_HISTORY_KEY: &str = "performanceHistory";

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
}

pub fn get_db_connection(data_dir: &Path) -> Result<Connection> {
    let db_path = data_dir.join(".qatrack").join("state.db");
    let conn = Connection::open(db_path)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

pub fn load_slot(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

/// Replaces the whole slot value.
pub fn save_slot(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )?;
    Ok(())
}

/// Missing or unreadable history is treated as empty. Only storage errors propagate.
pub fn load_performance_history(conn: &Connection) -> Result<PerformanceHistory> {
    let Some(raw) = load_slot(conn, PERFORMANCE_HISTORY_KEY)? else {
        return Ok(PerformanceHistory::default());
    };

    match PerformanceHistory::from_json(&raw) {
        Ok(history) => Ok(history),
        Err(e) => {
            log::warn!("discarding unreadable {PERFORMANCE_HISTORY_KEY} slot: {e}");
            Ok(PerformanceHistory::default())
        }
    }
}

pub fn save_performance_history(conn: &Connection, history: &PerformanceHistory) -> Result<()> {
    let raw = history
        .to_json()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    save_slot(conn, PERFORMANCE_HISTORY_KEY, &raw)
}
