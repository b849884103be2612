//! Seeded randomness for reproducible runs.
//!
//! A run owns one [`Pcg64`] created from the configured seed. Parallel
//! phases never share it: the driver draws one seed per task, in issue
//! order, and each task builds its own generator from that seed. Results
//! therefore depend only on the run seed, not on thread scheduling.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Creates the run-level generator.
///
/// `None` draws a fresh seed from the thread-local entropy source.
pub fn create_rng(seed: Option<u64>) -> Pcg64 {
    Pcg64::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// Draws `n` independent task seeds from the run generator.
pub fn task_seeds<R: Rng>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.random()).collect()
}

/// Builds the generator for one task.
pub fn task_rng(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}

/// Picks two distinct indices in `0..len`, uniformly at random.
///
/// Both indices are redrawn until they differ.
///
/// # Panics
///
/// Panics if `len < 2`.
pub fn distinct_pair<R: Rng>(rng: &mut R, len: usize) -> (usize, usize) {
    assert!(len >= 2, "distinct_pair needs at least two candidates, got {len}");
    loop {
        let a = rng.random_range(0..len);
        let b = rng.random_range(0..len);
        if a != b {
            return (a, b);
        }
    }
}

/// Uniform subset of `amount` indices out of `0..len`, without replacement.
///
/// `amount` is clamped to `len`.
pub fn sample_indices<R: Rng>(rng: &mut R, len: usize, amount: usize) -> Vec<usize> {
    index::sample(rng, len, amount.min(len)).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(Some(7));
        let mut b = create_rng(Some(7));
        assert_eq!(task_seeds(&mut a, 8), task_seeds(&mut b, 8));
    }

    #[test]
    fn test_task_seeds_differ() {
        let mut rng = create_rng(Some(1));
        let seeds = task_seeds(&mut rng, 100);
        let unique: HashSet<_> = seeds.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_sample_clamps_amount() {
        let mut rng = create_rng(Some(3));
        let picked = sample_indices(&mut rng, 4, 10);
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn test_sample_empty() {
        let mut rng = create_rng(Some(3));
        assert!(sample_indices(&mut rng, 0, 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "at least two candidates")]
    fn test_distinct_pair_single_candidate_panics() {
        let mut rng = create_rng(Some(3));
        distinct_pair(&mut rng, 1);
    }

    #[test]
    #[should_panic(expected = "at least two candidates")]
    fn test_distinct_pair_empty_panics() {
        let mut rng = create_rng(Some(3));
        distinct_pair(&mut rng, 0);
    }

    proptest! {
        #[test]
        fn prop_distinct_pair_never_equal(len in 2usize..64, seed in any::<u64>()) {
            let mut rng = create_rng(Some(seed));
            for _ in 0..32 {
                let (a, b) = distinct_pair(&mut rng, len);
                prop_assert_ne!(a, b);
                prop_assert!(a < len && b < len);
            }
        }

        #[test]
        fn prop_sample_is_unique_and_in_range(len in 0usize..64, frac in 0.0f64..=1.0, seed in any::<u64>()) {
            let mut rng = create_rng(Some(seed));
            let amount = (frac * len as f64).round() as usize;
            let picked = sample_indices(&mut rng, len, amount);
            prop_assert_eq!(picked.len(), amount);
            let unique: HashSet<_> = picked.iter().copied().collect();
            prop_assert_eq!(unique.len(), amount);
            prop_assert!(picked.iter().all(|&i| i < len));
        }
    }
}
