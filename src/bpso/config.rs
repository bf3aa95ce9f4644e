//! BPSO configuration.

use crate::convergence::curve_capacity;
use crate::error::{OptError, Result};
use crate::swarm::SwarmParams;
use crate::transfer::TransferFunction;

/// Configuration for Binary Particle Swarm Optimization.
///
/// ```
/// use u_pixelopt::bpso::{BpsoConfig, TransferFunction};
///
/// let config = BpsoConfig::new(100)
///     .with_transfer(TransferFunction::Sigmoid)
///     .with_v_max(4.0);
/// assert_eq!(config.transfer, TransferFunction::Sigmoid);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpsoConfig {
    /// Number of bits per particle.
    pub solution_length: usize,

    /// Number of particles.
    pub population_size: usize,

    /// Number of iterations.
    pub max_iterations: usize,

    /// Velocity update hyperparameters.
    pub swarm: SwarmParams,

    /// Velocity-to-bit mapping.
    pub transfer: TransferFunction,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl BpsoConfig {
    /// Creates a configuration for particles of `solution_length` bits.
    pub fn new(solution_length: usize) -> Self {
        Self {
            solution_length,
            population_size: 20,
            max_iterations: 50,
            swarm: SwarmParams::binary(),
            transfer: TransferFunction::default(),
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

    pub fn with_v_max(mut self, v_max: f64) -> Self {
        self.swarm.v_max = v_max;
        self
    }

    pub fn with_inertia_weight(mut self, w: f64) -> Self {
        self.swarm.inertia_weight = w;
        self
    }

    /// Sets the cognitive and social coefficients.
    pub fn with_coefficients(mut self, c1: f64, c2: f64) -> Self {
        self.swarm.c1 = c1;
        self.swarm.c2 = c2;
        self
    }

    /// Uses fixed `r1, r2` instead of drawing them at random.
    pub fn with_fixed_ratios(mut self, personal: f64, global: f64) -> Self {
        self.swarm.ratio_personal = personal;
        self.swarm.ratio_global = global;
        self.swarm.ratio_random = false;
        self
    }

    pub fn with_transfer(mut self, transfer: TransferFunction) -> Self {
        self.transfer = transfer;
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
        self.swarm.validate()?;
        curve_capacity(self.max_iterations, 1)?;
        Ok(())
    }
}
