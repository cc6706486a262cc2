use super::HistoryRecord;
use rand::Rng;

/// Fisher-Yates, iterating from the last index down to 1 and swapping with
/// a uniformly chosen index in `[0, i]`. Uniform over all n! permutations.
pub fn shuffle_in_place<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Rotation-boundary shuffle: the previous run's last element opens the new
/// order and the previous first element closes it, so whoever just went
/// last goes first next time. The middle is a plain shuffle.
///
/// Reads and updates `history.last_rotation`. Pools of size 0 or 1 are
/// returned unchanged and leave the history untouched. If either previous
/// boundary element has left the pool, the whole pool is reshuffled fresh.
/// Always returns a permutation of the input; never fails.
pub fn run_rotation_shuffle<R: Rng>(
    pool: &[String],
    history: &mut HistoryRecord,
    rng: &mut R,
) -> Vec<String> {
    if pool.len() <= 1 {
        return pool.to_vec();
    }
    let order = rotation_order(pool, history.last_rotation.as_deref(), rng);
    history.last_rotation = Some(order.clone());
    order
}

fn rotation_order<R: Rng>(
    pool: &[String],
    last_rotation: Option<&[String]>,
    rng: &mut R,
) -> Vec<String> {
    if let Some(last) = last_rotation {
        if let (Some(prev_first), Some(prev_last)) = (last.first(), last.last()) {
            // Elements are tracked by id, so duplicate labels never collide.
            // A previous single-element rotation has identical boundaries and
            // cannot constrain a larger pool.
            if prev_first != prev_last
                && pool.iter().any(|id| id == prev_first)
                && pool.iter().any(|id| id == prev_last)
            {
                let mut middle: Vec<String> = Vec::with_capacity(pool.len().saturating_sub(2));
                let mut drop_first = true;
                let mut drop_last = true;
                for id in pool {
                    if drop_first && id == prev_first {
                        drop_first = false;
                        continue;
                    }
                    if drop_last && id == prev_last {
                        drop_last = false;
                        continue;
                    }
                    middle.push(id.clone());
                }
                shuffle_in_place(&mut middle, rng);

                let mut order = Vec::with_capacity(pool.len());
                order.push(prev_last.clone());
                order.extend(middle);
                order.push(prev_first.clone());
                return order;
            }
        }
    }

    // First run, or the pool changed underneath us: fresh shuffle.
    let mut order = pool.to_vec();
    shuffle_in_place(&mut order, rng);
    order
}
