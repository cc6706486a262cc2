use crate::engine::{self, Item, Participant};
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_required_str, load_history, parse_required, require_db, save_history, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use uuid::Uuid;

/// Round-robin assigner: `{historyKey, participants, items}` in, an
/// assignment per item plus the updated (already persisted) history out.
fn assigner_run(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let history_key = get_required_str(params, "historyKey")?;
    let participants: Vec<Participant> = parse_required(params, "participants")?;
    let items: Vec<Item> = parse_required(params, "items")?;

    let (history, history_reset) = load_history(conn, &history_key)?;

    let mut rng = rand::thread_rng();
    let outcome = engine::run_round_robin(&participants, &items, &history, &mut rng)
        .map_err(HandlerErr::from_engine)?;

    let history_value = save_history(conn, &history_key, &outcome.history)?;

    let mut by_item = serde_json::Map::new();
    for assignment in &outcome.assignments {
        by_item.insert(
            assignment.item_id.clone(),
            json!(assignment.participant_ids),
        );
    }

    Ok(json!({
        "runId": Uuid::new_v4().to_string(),
        "historyKey": history_key,
        "assignments": outcome.assignments,
        "assignmentsByItem": by_item,
        "history": history_value,
        "historyReset": history_reset,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assigner.run" => Some(match assigner_run(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
