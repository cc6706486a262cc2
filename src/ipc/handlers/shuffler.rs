use crate::engine;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_required_str, load_history, parse_id_pool, require_db, save_history, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use uuid::Uuid;

/// Rotation-boundary shuffle: `{historyKey, pool}` in, a new order out.
/// Never rejects a pool; tiny pools simply pass through.
fn shuffler_run(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let history_key = get_required_str(params, "historyKey")?;
    let pool = parse_id_pool(params, "pool")?;

    let (mut history, history_reset) = load_history(conn, &history_key)?;

    let mut rng = rand::thread_rng();
    let order = engine::run_rotation_shuffle(&pool, &mut history, &mut rng);

    let history_value = save_history(conn, &history_key, &history)?;

    Ok(json!({
        "runId": Uuid::new_v4().to_string(),
        "historyKey": history_key,
        "order": order,
        "history": history_value,
        "historyReset": history_reset,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "shuffler.run" => Some(match shuffler_run(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
