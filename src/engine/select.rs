use super::shuffle::shuffle_in_place;
use super::EngineError;
use rand::Rng;

/// Uniform pick of a single element. Deliberately history-free: fungible
/// resources do not need rotation fairness, so consecutive calls may
/// legitimately return the same element.
pub fn select_one<'a, T, R: Rng>(pool: &'a [T], rng: &mut R) -> Result<&'a T, EngineError> {
    if pool.is_empty() {
        return Err(EngineError::new("empty_pool", "cannot pick from an empty pool"));
    }
    Ok(&pool[rng.gen_range(0..pool.len())])
}

/// Uniform draw of `k` distinct elements (shuffle a copy, take the prefix).
pub fn select_k<T: Clone, R: Rng>(pool: &[T], k: usize, rng: &mut R) -> Result<Vec<T>, EngineError> {
    if pool.is_empty() {
        return Err(EngineError::new("empty_pool", "cannot pick from an empty pool"));
    }
    if k > pool.len() {
        return Err(EngineError::new(
            "pool_too_small",
            format!("requested {} picks from a pool of {}", k, pool.len()),
        ));
    }
    let mut copy = pool.to_vec();
    shuffle_in_place(&mut copy, rng);
    copy.truncate(k);
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn empty_pool_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let pool: Vec<String> = Vec::new();
        let err = select_one(&pool, &mut rng).unwrap_err();
        assert_eq!(err.code, "empty_pool");
        let err = select_k(&pool, 1, &mut rng).unwrap_err();
        assert_eq!(err.code, "empty_pool");
    }

    #[test]
    fn oversized_request_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let pool = vec!["a", "b"];
        let err = select_k(&pool, 3, &mut rng).unwrap_err();
        assert_eq!(err.code, "pool_too_small");
    }

    #[test]
    fn select_k_returns_distinct_pool_members() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let pool = vec!["a", "b", "c", "d", "e"];
        let picked = select_k(&pool, 3, &mut rng).expect("pick 3");
        assert_eq!(picked.len(), 3);
        let mut unique = picked.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
        for p in &picked {
            assert!(pool.contains(p));
        }
    }

    #[test]
    fn select_one_is_roughly_uniform_on_a_coin_flip() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let pool = vec!["heads", "tails"];
        let mut heads = 0usize;
        for _ in 0..1000 {
            if *select_one(&pool, &mut rng).expect("pick") == "heads" {
                heads += 1;
            }
        }
        // No history influence; expect ~500 with slack for the fixed seed.
        assert!((430..=570).contains(&heads), "skewed heads count {heads}");
    }
}
