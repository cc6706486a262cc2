use crate::db;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, load_history, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn history_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let history_key = get_required_str(params, "historyKey")?;
    let exists = db::history_get(conn, &history_key)
        .map_err(HandlerErr::db)?
        .is_some();
    let (record, history_reset) = load_history(conn, &history_key)?;
    let history = serde_json::to_value(&record)
        .map_err(|e| HandlerErr::new("internal", format!("serialize history: {}", e)))?;
    Ok(json!({
        "historyKey": history_key,
        "exists": exists,
        "history": history,
        "historyReset": history_reset,
    }))
}

fn history_reset(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let history_key = get_required_str(params, "historyKey")?;
    let removed = db::history_delete(conn, &history_key).map_err(HandlerErr::db)?;
    Ok(json!({
        "historyKey": history_key,
        "removed": removed,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "history.get" => Some(match history_get(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        "history.reset" => Some(match history_reset(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
