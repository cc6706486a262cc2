use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("assigner.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS assigner_history(
            key TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;

    Ok(conn)
}

pub fn history_get(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT payload FROM assigner_history WHERE key = ?",
        [key],
        |r| r.get(0),
    )
    .optional()
}

/// Last-write-wins: concurrent runs against the same key may interleave;
/// the later save replaces the earlier one and the next run self-corrects.
pub fn history_save(conn: &Connection, key: &str, payload: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO assigner_history(key, payload, updated_at) VALUES(?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        rusqlite::params![key, payload, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn history_delete(conn: &Connection, key: &str) -> rusqlite::Result<bool> {
    let n = conn.execute("DELETE FROM assigner_history WHERE key = ?", [key])?;
    Ok(n > 0)
}
