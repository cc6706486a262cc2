pub mod history;
pub mod round_robin;
pub mod select;
pub mod shuffle;

pub use history::HistoryRecord;
pub use round_robin::{run_round_robin, Item, PairGroup, Participant};
pub use select::{select_k, select_one};
pub use shuffle::run_rotation_shuffle;

use serde::Serialize;

/// Engine-level failure with a stable string code that surfaces directly
/// as an IPC error code.
#[derive(Debug, Clone, Serialize)]
pub struct EngineError {
    pub code: String,
    pub message: String,
}

impl EngineError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for EngineError {}
