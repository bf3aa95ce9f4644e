//! Transfer functions mapping a real-valued velocity to a bit decision.
//!
//! Binary swarm methods keep a continuous velocity per dimension and use a
//! transfer function to turn it into a probability.
//!
//! # References
//!
//! - Kennedy & Eberhart (1997), "A Discrete Binary Version of the Particle
//!   Swarm Algorithm" (S-shaped)
//! - Mirjalili & Lewis (2013), "S-shaped versus V-shaped transfer functions
//!   for binary Particle Swarm Optimization"

use rand::Rng;
use std::f64::consts::FRAC_PI_2;

/// Strategy used to turn a velocity into the next bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferFunction {
    /// Sigmoid: the bit is set to 1 with probability `1 / (1 + e^-v)`,
    /// independently of its current value.
    Sigmoid,

    /// V-shaped: the current bit is flipped with probability
    /// `|(2/π)·atan((π/2)·v)|`. A zero velocity never flips.
    #[default]
    VShaped,
}

impl TransferFunction {
    /// Returns the probability associated with velocity `v`.
    pub fn probability(&self, v: f64) -> f64 {
        match self {
            TransferFunction::Sigmoid => s_shaped(v),
            TransferFunction::VShaped => v_shaped(v),
        }
    }

    /// Produces the next value of `bit` given velocity `v`.
    pub fn apply<R: Rng>(&self, bit: u8, v: f64, rng: &mut R) -> u8 {
        let p = self.probability(v);
        let hit = rng.random_range(0.0..1.0) < p;
        match self {
            TransferFunction::Sigmoid => u8::from(hit),
            TransferFunction::VShaped if hit => crate::binary::flip(bit),
            TransferFunction::VShaped => bit,
        }
    }
}

/// Logistic sigmoid, `1 / (1 + e^-v)`.
pub fn s_shaped(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// Flip probability `|(2/π)·atan((π/2)·v)|`, in `[0, 1)`.
pub fn v_shaped(v: f64) -> f64 {
    ((FRAC_PI_2 * v).atan() / FRAC_PI_2).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_s_shaped_midpoint() {
        assert!((s_shaped(0.0) - 0.5).abs() < 1e-15);
        assert!(s_shaped(10.0) > 0.99);
        assert!(s_shaped(-10.0) < 0.01);
    }

    #[test]
    fn test_v_shaped_symmetric() {
        assert_eq!(v_shaped(0.0), 0.0);
        assert!((v_shaped(1.5) - v_shaped(-1.5)).abs() < 1e-15);
        assert!(v_shaped(100.0) < 1.0);
        assert!(v_shaped(100.0) > 0.99);
    }

    #[test]
    fn test_v_shaped_zero_velocity_keeps_bit() {
        let mut rng = create_rng(1);
        for _ in 0..100 {
            assert_eq!(TransferFunction::VShaped.apply(1, 0.0, &mut rng), 1);
            assert_eq!(TransferFunction::VShaped.apply(0, 0.0, &mut rng), 0);
        }
    }

    #[test]
    fn test_sigmoid_large_velocity_sets_bit() {
        let mut rng = create_rng(1);
        let ones = (0..1000)
            .filter(|_| TransferFunction::Sigmoid.apply(0, 20.0, &mut rng) == 1)
            .count();
        assert!(ones > 990, "got {ones}");
    }

    #[test]
    fn test_default_is_v_shaped() {
        assert_eq!(TransferFunction::default(), TransferFunction::VShaped);
    }
}
