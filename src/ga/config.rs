//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use crate::convergence::curve_capacity;
use crate::error::{OptError, Result};

/// Configuration for the binary Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_pixelopt::ga::GaConfig;
///
/// let config = GaConfig::new(40);
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.max_iterations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_pixelopt::ga::GaConfig;
///
/// let config = GaConfig::new(40)
///     .with_population_size(50)
///     .with_crossover_rate(0.8)
///     .with_mutation_rate(0.02)
///     .with_seed(1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of bits per individual.
    pub solution_length: usize,

    /// Number of individuals in the population.
    ///
    /// Fixed for the whole run: every generation fully replaces the last.
    pub population_size: usize,

    /// Number of generations.
    pub max_iterations: usize,

    /// Probability of applying single-point crossover to a parent pair (0.0–1.0).
    ///
    /// When crossover is not applied, the children are clones of the parents.
    pub crossover_rate: f64,

    /// Probability of flipping one random bit of an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl GaConfig {
    /// Creates a configuration for individuals of `solution_length` bits.
    pub fn new(solution_length: usize) -> Self {
        Self {
            solution_length,
            population_size: 20,
            max_iterations: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.005,
            seed: None,
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
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
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(OptError::InvalidConfig(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OptError::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        curve_capacity(self.max_iterations, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::new(12);
        assert_eq!(config.solution_length, 12);
        assert_eq!(config.population_size, 20);
        assert_eq!(config.max_iterations, 100);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.005).abs() < 1e-10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::new(5)
            .with_population_size(8)
            .with_max_iterations(3)
            .with_crossover_rate(0.7)
            .with_mutation_rate(0.1)
            .with_seed(42);

        assert_eq!(config.population_size, 8);
        assert_eq!(config.max_iterations, 3);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::new(4).validate().is_ok());
    }

    #[test]
    fn test_validate_empty_population() {
        let config = GaConfig::new(4).with_population_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_length() {
        assert!(GaConfig::new(0).validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::new(4)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);

        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects_raw_out_of_range_rate() {
        let mut config = GaConfig::new(4);
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }
}
