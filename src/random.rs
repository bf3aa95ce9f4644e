//! Random number helpers shared by the runners.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from an optional seed, drawing one from entropy if absent.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}

/// Shuffles a slice in place (Fisher-Yates).
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Returns `len` uniformly random bits encoded as 0/1.
pub fn random_bits<R: Rng>(len: usize, rng: &mut R) -> Vec<u8> {
    (0..len).map(|_| u8::from(rng.random_bool(0.5))).collect()
}

/// Returns `len` values drawn uniformly from `[0, 1)`.
pub fn random_unit<R: Rng>(len: usize, rng: &mut R) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(0.0..1.0)).collect()
}

/// Draws an index with probability proportional to `weights`.
///
/// Falls back to a uniform draw when the weights sum to zero, which happens
/// when every individual shares the same cost.
///
/// # Panics
/// Panics if `weights` is empty.
pub fn weighted_index<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    assert!(!weights.is_empty(), "cannot sample from empty weights");

    let n = weights.len();
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        assert_eq!(random_bits(64, &mut a), random_bits(64, &mut b));
    }

    #[test]
    fn test_random_bits_are_binary() {
        let mut rng = create_rng(42);
        let bits = random_bits(1000, &mut rng);
        assert_eq!(bits.len(), 1000);
        assert!(bits.iter().all(|&b| b <= 1));
        assert!(bits.iter().any(|&b| b == 0));
        assert!(bits.iter().any(|&b| b == 1));
    }

    #[test]
    fn test_random_unit_range() {
        let mut rng = create_rng(42);
        assert!(random_unit(500, &mut rng)
            .iter()
            .all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = create_rng(3);
        let mut items: Vec<usize> = (0..50).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_weighted_index_favors_heavy() {
        let mut rng = create_rng(42);
        let weights = [0.0, 1.0, 9.0];
        let mut counts = [0u32; 3];
        for _ in 0..10000 {
            counts[weighted_index(&weights, &mut rng)] += 1;
        }
        assert_eq!(counts[0], 0, "zero weight must never be drawn");
        assert!(counts[2] > counts[1] * 5, "got {counts:?}");
    }

    #[test]
    fn test_weighted_index_all_zero_is_uniform() {
        let mut rng = create_rng(42);
        let weights = [0.0; 4];
        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[weighted_index(&weights, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got {counts:?}");
        }
    }

    #[test]
    #[should_panic(expected = "cannot sample from empty weights")]
    fn test_weighted_index_empty_panics() {
        let mut rng = create_rng(42);
        weighted_index(&[], &mut rng);
    }
}
