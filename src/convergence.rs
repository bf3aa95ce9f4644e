//! Running-best history recorded by every runner.

use crate::error::{OptError, Result};

/// Largest number of samples a curve can be sized for.
pub(crate) const MAX_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// Curve capacity for `max_iterations` iterations of `per_iteration` samples.
/// Fails when the product overflows or exceeds [`MAX_CAPACITY`].
pub(crate) fn curve_capacity(max_iterations: usize, per_iteration: usize) -> Result<usize> {
    max_iterations
        .checked_mul(per_iteration)
        .filter(|&capacity| capacity <= MAX_CAPACITY)
        .ok_or_else(|| {
            OptError::InvalidConfig(format!(
                "max_iterations {max_iterations} needs a convergence curve larger than \
                 {MAX_CAPACITY} samples"
            ))
        })
}

/// Fixed-capacity, append-only record of the best cost over time.
///
/// The capacity is decided when a runner is constructed (one slot per
/// evaluation for DBS, one per iteration for the population methods) and
/// never grows. Writes past the capacity are dropped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceCurve {
    values: Vec<f64>,
    capacity: usize,
}

impl ConvergenceCurve {
    /// Creates an empty curve with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a best-cost sample. Returns `false` if the curve is full.
    pub fn record(&mut self, best_cost: f64) -> bool {
        if self.is_full() {
            return false;
        }
        self.values.push(best_cost);
        true
    }

    /// The samples written so far.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// The most recent sample, if any.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Returns `true` if no sample is larger than the one before it.
    pub fn is_non_increasing(&self) -> bool {
        self.values.windows(2).all(|w| w[1] <= w[0])
    }
}

/// Index of the first minimum.
pub(crate) fn argmin(values: &[f64]) -> usize {
    let mut idx = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[idx] {
            idx = i;
        }
    }
    idx
}

/// Index of the first maximum.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut idx = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[idx] {
            idx = i;
        }
    }
    idx
}
