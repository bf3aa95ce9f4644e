//! Velocity rule shared by the continuous and binary particle swarms.
//!
//! Each dimension of a particle's velocity is updated as
//!
//! ```text
//! v' = clamp(w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x), −v_max, v_max)
//! ```
//!
//! where `r1, r2` are drawn uniformly from `[0, 1)` once per particle and
//! iteration when `ratio_random` is set, and are the fixed
//! `ratio_personal`, `ratio_global` otherwise.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer" (inertia weight)
//! - Clerc & Kennedy (2002), "The particle swarm - explosion, stability, and
//!   convergence in a multidimensional complex space" (default coefficients)

use rand::Rng;

use crate::error::{OptError, Result};

/// Hyperparameters of the swarm velocity update.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmParams {
    /// Velocity magnitude limit per dimension.
    pub v_max: f64,

    /// Inertia weight `w` applied to the previous velocity.
    pub inertia_weight: f64,

    /// Cognitive coefficient: pull toward the particle's own best.
    pub c1: f64,

    /// Social coefficient: pull toward the swarm's best.
    pub c2: f64,

    /// Fixed `r1` used when `ratio_random` is `false`.
    pub ratio_personal: f64,

    /// Fixed `r2` used when `ratio_random` is `false`.
    pub ratio_global: f64,

    /// Draw `r1, r2` at random for every particle and iteration.
    pub ratio_random: bool,
}

impl SwarmParams {
    /// Defaults for positions normalized to `[0, 1]`.
    pub fn continuous() -> Self {
        Self {
            v_max: 0.2,
            inertia_weight: 0.7298,
            c1: 1.49618,
            c2: 1.49618,
            ratio_personal: 0.5,
            ratio_global: 0.5,
            ratio_random: true,
        }
    }

    /// Defaults for 0/1 positions, where velocity feeds a transfer function.
    pub fn binary() -> Self {
        Self {
            v_max: 6.0,
            ..Self::continuous()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.v_max.is_finite() && self.v_max > 0.0) {
            return Err(OptError::InvalidConfig(format!(
                "v_max must be positive and finite, got {}",
                self.v_max
            )));
        }
        if !self.inertia_weight.is_finite() {
            return Err(OptError::InvalidConfig(
                "inertia_weight must be finite".into(),
            ));
        }
        for (name, c) in [("c1", self.c1), ("c2", self.c2)] {
            if !(c.is_finite() && c >= 0.0) {
                return Err(OptError::InvalidConfig(format!(
                    "{name} must be non-negative and finite, got {c}"
                )));
            }
        }
        for (name, r) in [
            ("ratio_personal", self.ratio_personal),
            ("ratio_global", self.ratio_global),
        ] {
            if !(0.0..=1.0).contains(&r) {
                return Err(OptError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {r}"
                )));
            }
        }
        Ok(())
    }

    /// Returns `(r1, r2)` for one particle update.
    pub(crate) fn ratios<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        if self.ratio_random {
            (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0))
        } else {
            (self.ratio_personal, self.ratio_global)
        }
    }

    /// Updated, clamped velocity for one dimension.
    pub(crate) fn velocity(&self, v: f64, x: f64, pbest: f64, gbest: f64, r: (f64, f64)) -> f64 {
        let (r1, r2) = r;
        let v = self.inertia_weight * v + self.c1 * r1 * (pbest - x) + self.c2 * r2 * (gbest - x);
        v.clamp(-self.v_max, self.v_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_defaults() {
        let c = SwarmParams::continuous();
        assert!((c.v_max - 0.2).abs() < 1e-15);
        assert!(c.ratio_random);
        let b = SwarmParams::binary();
        assert!((b.v_max - 6.0).abs() < 1e-15);
        assert!((b.inertia_weight - c.inertia_weight).abs() < 1e-15);
        assert!(c.validate().is_ok() && b.validate().is_ok());
    }

    #[test]
    fn test_fixed_ratios() {
        let params = SwarmParams {
            ratio_random: false,
            ratio_personal: 0.3,
            ratio_global: 0.7,
            ..SwarmParams::continuous()
        };
        let mut rng = create_rng(1);
        assert_eq!(params.ratios(&mut rng), (0.3, 0.7));
    }

    #[test]
    fn test_velocity_formula() {
        let params = SwarmParams {
            v_max: 10.0,
            inertia_weight: 0.5,
            c1: 1.0,
            c2: 2.0,
            ..SwarmParams::continuous()
        };
        // 0.5*1 + 1*0.5*(0.6-0.2) + 2*0.25*(1.0-0.2) = 0.5 + 0.2 + 0.4
        let v = params.velocity(1.0, 0.2, 0.6, 1.0, (0.5, 0.25));
        assert!((v - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_clamped() {
        let params = SwarmParams::continuous();
        assert_eq!(params.velocity(5.0, 0.0, 1.0, 1.0, (1.0, 1.0)), 0.2);
        assert_eq!(params.velocity(-5.0, 1.0, 0.0, 0.0, (1.0, 1.0)), -0.2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut p = SwarmParams::continuous();
        p.v_max = 0.0;
        assert!(p.validate().is_err());

        let mut p = SwarmParams::continuous();
        p.c2 = -1.0;
        assert!(p.validate().is_err());

        let mut p = SwarmParams::continuous();
        p.ratio_global = 1.5;
        assert!(p.validate().is_err());
    }
}
