use crate::db;
use crate::engine::{EngineError, HistoryRecord};
use crate::ipc::error::err;
use crate::ipc::types::AppState;
use rusqlite::Connection;
use serde::de::DeserializeOwned;

pub struct HandlerErr {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn from_engine(e: EngineError) -> Self {
        Self {
            code: e.code,
            message: e.message,
            details: None,
        }
    }

    pub fn db(e: rusqlite::Error) -> Self {
        Self::new("db_query_failed", e.to_string())
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, &self.code, self.message, self.details)
    }
}

pub fn require_db(state: &AppState) -> Result<&Connection, HandlerErr> {
    state
        .db
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

pub fn parse_required<T: DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, HandlerErr> {
    let Some(raw) = params.get(key) else {
        return Err(HandlerErr::new("bad_params", format!("missing {}", key)));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::new("bad_params", format!("invalid {}: {}", key, e)))
}

/// Pools arrive either as bare id strings or as `{id, ...}` objects.
pub fn parse_id_pool(params: &serde_json::Value, key: &str) -> Result<Vec<String>, HandlerErr> {
    let Some(raw) = params.get(key).and_then(|v| v.as_array()) else {
        return Err(HandlerErr::new(
            "bad_params",
            format!("{} must be an array", key),
        ));
    };
    let mut pool = Vec::with_capacity(raw.len());
    for entry in raw {
        if let Some(s) = entry.as_str() {
            pool.push(s.to_string());
            continue;
        }
        let Some(id) = entry.get("id").and_then(|v| v.as_str()) else {
            return Err(HandlerErr::new(
                "bad_params",
                format!("{} entries must be strings or objects with an id", key),
            ));
        };
        pool.push(id.to_string());
    }
    Ok(pool)
}

/// Load the stored history blob for a key. A blob that is unreadable or has
/// a foreign shape is discarded and replaced with a fresh record; the bool
/// reports that reset so callers can surface it to the user.
pub fn load_history(conn: &Connection, key: &str) -> Result<(HistoryRecord, bool), HandlerErr> {
    let Some(text) = db::history_get(conn, key).map_err(HandlerErr::db)? else {
        return Ok((HistoryRecord::default(), false));
    };
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(raw) => {
            let (record, reset) = HistoryRecord::from_saved(Some(&raw));
            if reset {
                eprintln!("assignerd: discarding malformed history for key {}", key);
            }
            Ok((record, reset))
        }
        Err(_) => {
            eprintln!("assignerd: discarding unreadable history for key {}", key);
            Ok((HistoryRecord::default(), true))
        }
    }
}

pub fn save_history(
    conn: &Connection,
    key: &str,
    record: &HistoryRecord,
) -> Result<serde_json::Value, HandlerErr> {
    let value = serde_json::to_value(record)
        .map_err(|e| HandlerErr::new("internal", format!("serialize history: {}", e)))?;
    db::history_save(conn, key, &value.to_string()).map_err(HandlerErr::db)?;
    Ok(value)
}
