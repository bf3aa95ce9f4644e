//! Bat algorithm configuration.

use crate::convergence::curve_capacity;
use crate::error::{OptError, Result};

/// Configuration for the Binary Bat Algorithm.
///
/// # Examples
///
/// ```
/// use u_pixelopt::bat::BatConfig;
///
/// let config = BatConfig::new(32)
///     .with_loudness(0.5)
///     .with_frequency_range(0.0, 1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatConfig {
    /// Number of bits per bat.
    pub solution_length: usize,

    /// Number of bats.
    pub population_size: usize,

    /// Number of iterations.
    pub max_iterations: usize,

    /// Probability that an improving trial replaces its bat.
    pub loudness: f64,

    /// Probability of skipping the pull toward the best bat, per bit.
    pub pulse_rate: f64,

    /// Lower end of the frequency range.
    pub q_min: f64,

    /// Upper end of the frequency range.
    pub q_max: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl BatConfig {
    /// Creates a configuration for bats of `solution_length` bits.
    pub fn new(solution_length: usize) -> Self {
        Self {
            solution_length,
            population_size: 20,
            max_iterations: 500,
            loudness: 0.25,
            pulse_rate: 0.1,
            q_min: 0.0,
            q_max: 2.0,
            seed: None,
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_loudness(mut self, loudness: f64) -> Self {
        self.loudness = loudness;
        self
    }

    pub fn with_pulse_rate(mut self, rate: f64) -> Self {
        self.pulse_rate = rate;
        self
    }

    /// Sets the range frequencies are drawn from.
    pub fn with_frequency_range(mut self, q_min: f64, q_max: f64) -> Self {
        self.q_min = q_min;
        self.q_max = q_max;
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
        if self.population_size == 0 {
            return Err(OptError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        for (name, p) in [("loudness", self.loudness), ("pulse_rate", self.pulse_rate)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(OptError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }
        if !(self.q_min.is_finite() && self.q_max.is_finite()) || self.q_min > self.q_max {
            return Err(OptError::InvalidConfig(format!(
                "frequency range [{}, {}] is invalid",
                self.q_min, self.q_max
            )));
        }
        curve_capacity(self.max_iterations, 1)?;
        Ok(())
    }
}
