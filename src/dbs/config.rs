//! DBS configuration.

use crate::convergence::curve_capacity;
use crate::error::{OptError, Result};

/// Configuration for Direct Binary Search.
///
/// # Examples
///
/// ```
/// use u_pixelopt::dbs::DbsConfig;
///
/// let config = DbsConfig::new(64)
///     .with_max_iterations(6)
///     .with_seed(7);
/// assert_eq!(config.solution_length, 64);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbsConfig {
    /// Number of pixels (bits) in a solution.
    pub solution_length: usize,

    /// Number of full sweeps over all positions.
    ///
    /// Each sweep costs `solution_length` evaluations.
    pub max_iterations: usize,

    /// Starting point. `None` draws uniformly random bits.
    pub initial_solution: Option<Vec<u8>>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl DbsConfig {
    /// Creates a configuration for solutions of `solution_length` bits.
    pub fn new(solution_length: usize) -> Self {
        Self {
            solution_length,
            max_iterations: 4,
            initial_solution: None,
            seed: None,
        }
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the starting solution. Must be `solution_length` bits of 0/1.
    pub fn with_initial_solution(mut self, solution: Vec<u8>) -> Self {
        self.initial_solution = Some(solution);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.solution_length == 0 {
            return Err(OptError::InvalidConfig(
                "solution_length must be at least 1".into(),
            ));
        }
        if let Some(initial) = &self.initial_solution {
            crate::binary::validate(initial, self.solution_length)?;
        }
        curve_capacity(self.max_iterations, self.solution_length)?;
        Ok(())
    }
}
