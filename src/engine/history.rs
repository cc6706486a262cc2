use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-persisted fairness state. The engine reads a record at the start
/// of a run and returns an updated copy; it never stores anything itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    /// participant id -> item id -> times assigned.
    pub completions: HashMap<String, HashMap<String, u64>>,
    /// participant id -> total assignments across all items.
    pub total_assignments: HashMap<String, u64>,
    /// Previous shuffler output, used only by the rotation-boundary shuffle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rotation: Option<Vec<String>>,
}

impl HistoryRecord {
    pub fn completion_count(&self, participant_id: &str, item_id: &str) -> u64 {
        self.completions
            .get(participant_id)
            .and_then(|per_item| per_item.get(item_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_for(&self, participant_id: &str) -> u64 {
        self.total_assignments
            .get(participant_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn record_assignment(&mut self, participant_id: &str, item_id: &str) {
        *self
            .completions
            .entry(participant_id.to_string())
            .or_default()
            .entry(item_id.to_string())
            .or_insert(0) += 1;
        *self
            .total_assignments
            .entry(participant_id.to_string())
            .or_insert(0) += 1;
    }

    /// Lenient loader for stored blobs. Absent or null means a fresh record.
    /// A blob that no longer parses (corrupt, or written by something else)
    /// is discarded and replaced with a fresh record; the second tuple field
    /// reports that reset so callers can surface it.
    pub fn from_saved(raw: Option<&serde_json::Value>) -> (Self, bool) {
        let Some(raw) = raw else {
            return (Self::default(), false);
        };
        if raw.is_null() {
            return (Self::default(), false);
        }
        match serde_json::from_value::<HistoryRecord>(raw.clone()) {
            Ok(record) => (record, false),
            Err(_) => (Self::default(), true),
        }
    }
}
