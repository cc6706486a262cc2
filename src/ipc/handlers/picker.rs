use crate::engine;
use crate::ipc::error::ok;
use crate::ipc::helpers::{parse_id_pool, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use uuid::Uuid;

/// Unconstrained random pick for fungible resources. Reads and writes no
/// history, and needs no workspace: repeated identical picks are fine.
fn picker_pick(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let pool = parse_id_pool(params, "pool")?;
    let mut rng = rand::thread_rng();

    let picked: Vec<String> = match params.get("count") {
        None => {
            let one = engine::select_one(&pool, &mut rng).map_err(HandlerErr::from_engine)?;
            vec![one.clone()]
        }
        Some(raw) => {
            let Some(count) = raw.as_u64() else {
                return Err(HandlerErr::new("bad_params", "count must be a non-negative integer"));
            };
            engine::select_k(&pool, count as usize, &mut rng).map_err(HandlerErr::from_engine)?
        }
    };

    Ok(json!({
        "runId": Uuid::new_v4().to_string(),
        "picked": picked,
    }))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "picker.pick" => Some(match picker_pick(&req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
