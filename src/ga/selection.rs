//! Fitness-proportionate parent selection.
//!
//! Costs are minimized, so they are negated and shifted so the worst
//! individual gets weight zero: `w_i = max_cost - cost_i`. Parents are then
//! drawn by roulette wheel, with replacement.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

use crate::random::weighted_index;

/// Converts costs (lower is better) into non-negative selection weights.
///
/// All weights are zero when every cost is equal; [`select_parent`] then
/// samples uniformly.
pub fn selection_weights(costs: &[f64]) -> Vec<f64> {
    let max_cost = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    costs.iter().map(|&c| (max_cost - c).max(0.0)).collect()
}

/// Draws one parent index from precomputed weights.
///
/// # Panics
/// Panics if `weights` is empty.
pub fn select_parent<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    weighted_index(weights, rng)
}
