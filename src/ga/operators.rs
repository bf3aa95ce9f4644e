//! Bit-string crossover and mutation operators.
//!
//! # Crossover Operators
//!
//! - [`single_point_crossover`]: swap tails after a random cut, O(n)
//!
//! # Mutation Operators
//!
//! - [`flip_mutation`]: flip one random bit, O(1)
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

use rand::Rng;

use crate::binary;

/// Single-point crossover for bit strings.
///
/// A cut point `p` is drawn uniformly from `[0, n)`. The first child takes
/// `parent1[..p]` followed by `parent2[p..]`, the second child the reverse.
/// With `p = 0` the children are swapped copies of the parents.
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn single_point_crossover<R: Rng>(
    parent1: &[u8],
    parent2: &[u8],
    rng: &mut R,
) -> (Vec<u8>, Vec<u8>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let point = rng.random_range(0..n);
    crossover_at(parent1, parent2, point)
}

/// Single-point crossover at a fixed cut point.
pub(crate) fn crossover_at(parent1: &[u8], parent2: &[u8], point: usize) -> (Vec<u8>, Vec<u8>) {
    let mut child1 = Vec::with_capacity(parent1.len());
    child1.extend_from_slice(&parent1[..point]);
    child1.extend_from_slice(&parent2[point..]);

    let mut child2 = Vec::with_capacity(parent2.len());
    child2.extend_from_slice(&parent2[..point]);
    child2.extend_from_slice(&parent1[point..]);

    (child1, child2)
}

/// Flips one uniformly chosen bit.
///
/// # Panics
/// Panics if `bits` is empty.
pub fn flip_mutation<R: Rng>(bits: &mut [u8], rng: &mut R) {
    assert!(!bits.is_empty(), "cannot mutate an empty bit string");
    let idx = rng.random_range(0..bits.len());
    bits[idx] = binary::flip(bits[idx]);
}
