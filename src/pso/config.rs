//! PSO configuration.

use crate::convergence::curve_capacity;
use crate::error::{OptError, Result};
use crate::swarm::SwarmParams;

/// Configuration for the continuous Particle Swarm Optimizer.
///
/// The dimensionality comes from the [`ParamBounds`](super::ParamBounds)
/// handed to the runner. `solution_length`, when set, is checked against it.
///
/// ```
/// use u_pixelopt::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_population_size(30)
///     .with_inertia_weight(0.6)
///     .with_fixed_ratios(0.4, 0.6)
///     .with_seed(5);
/// assert!(!config.swarm.ratio_random);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    /// Expected number of dimensions; `None` accepts whatever the bounds define.
    pub solution_length: Option<usize>,

    /// Number of particles.
    pub population_size: usize,

    /// Number of iterations.
    pub max_iterations: usize,

    /// Velocity update hyperparameters, in normalized units.
    pub swarm: SwarmParams,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            solution_length: None,
            population_size: 20,
            max_iterations: 50,
            swarm: SwarmParams::continuous(),
            seed: None,
        }
    }
}

impl PsoConfig {
    pub fn with_solution_length(mut self, n: usize) -> Self {
        self.solution_length = Some(n);
        self
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

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(OptError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.solution_length == Some(0) {
            return Err(OptError::InvalidConfig(
                "solution_length must be at least 1".into(),
            ));
        }
        self.swarm.validate()?;
        curve_capacity(self.max_iterations, 1)?;
        Ok(())
    }
}
