use super::{EngineError, HistoryRecord};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Binary pairing attribute. Generalises the original "one male + one
/// female per job" rule without baking the meaning into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairGroup {
    A,
    B,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_group: Option<PairGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub requires_pair: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAssignment {
    pub item_id: String,
    pub item_label: String,
    pub participant_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RoundRobinOutcome {
    pub assignments: Vec<ItemAssignment>,
    pub history: HistoryRecord,
}

/// Round-robin rotation assignment.
///
/// Items are processed in stable input order. For each item the eligible
/// participant with the fewest completions of that item wins; ties fall to
/// the lowest total assignment count, then to a uniform random pick. The
/// minimum-completions rule is what guarantees nobody repeats an item while
/// someone else is still waiting at a strictly lower count.
///
/// `requires_pair` items take one participant from each pair group when both
/// groups are represented; otherwise both slots come from the whole pool
/// (and a single-participant pool yields a single-entry assignment).
///
/// The whole run is computed against a working copy of `history`; the input
/// record is never touched, so a failed run observes nothing.
pub fn run_round_robin<R: Rng>(
    participants: &[Participant],
    items: &[Item],
    history: &HistoryRecord,
    rng: &mut R,
) -> Result<RoundRobinOutcome, EngineError> {
    if participants.is_empty() {
        return Err(EngineError::new("no_participants", "participant pool is empty"));
    }
    if items.is_empty() {
        return Err(EngineError::new("empty_pool", "item pool is empty"));
    }

    let mut working = history.clone();
    let mut assignments = Vec::with_capacity(items.len());

    for item in items {
        let chosen = if item.requires_pair {
            pick_pair(participants, &item.id, &working, rng)
        } else {
            let everyone: Vec<&Participant> = participants.iter().collect();
            pick_by_priority(&everyone, &item.id, &working, rng)
                .map(|p| vec![p.id.clone()])
                .unwrap_or_default()
        };

        // Committing between items keeps total_assignments current, so later
        // items in the same run spread load away from earlier winners.
        for participant_id in &chosen {
            working.record_assignment(participant_id, &item.id);
        }
        assignments.push(ItemAssignment {
            item_id: item.id.clone(),
            item_label: item.label.clone(),
            participant_ids: chosen,
        });
    }

    Ok(RoundRobinOutcome {
        assignments,
        history: working,
    })
}

fn priority_key(p: &Participant, item_id: &str, history: &HistoryRecord) -> (u64, u64) {
    (
        history.completion_count(&p.id, item_id),
        history.total_for(&p.id),
    )
}

fn pick_by_priority<'a, R: Rng>(
    candidates: &[&'a Participant],
    item_id: &str,
    history: &HistoryRecord,
    rng: &mut R,
) -> Option<&'a Participant> {
    let best = candidates
        .iter()
        .map(|p| priority_key(p, item_id, history))
        .min()?;
    let tied: Vec<&'a Participant> = candidates
        .iter()
        .copied()
        .filter(|p| priority_key(p, item_id, history) == best)
        .collect();
    Some(tied[rng.gen_range(0..tied.len())])
}

fn pick_pair<R: Rng>(
    participants: &[Participant],
    item_id: &str,
    history: &HistoryRecord,
    rng: &mut R,
) -> Vec<String> {
    let group_a: Vec<&Participant> = participants
        .iter()
        .filter(|p| p.pair_group == Some(PairGroup::A))
        .collect();
    let group_b: Vec<&Participant> = participants
        .iter()
        .filter(|p| p.pair_group == Some(PairGroup::B))
        .collect();

    let (first_pool, second_pool) = if !group_a.is_empty() && !group_b.is_empty() {
        (group_a, group_b)
    } else {
        // One or both groups absent: fill both slots from whoever is left.
        let everyone: Vec<&Participant> = participants.iter().collect();
        (everyone.clone(), everyone)
    };

    let Some(first) = pick_by_priority(&first_pool, item_id, history, rng) else {
        return Vec::new();
    };
    let second_pool: Vec<&Participant> = second_pool
        .into_iter()
        .filter(|p| p.id != first.id)
        .collect();
    match pick_by_priority(&second_pool, item_id, history, rng) {
        Some(second) => vec![first.id.clone(), second.id.clone()],
        None => vec![first.id.clone()],
    }
}
