//! Particle Swarm Optimization (PSO) over bounded continuous parameters.
//!
//! Used for low-dimensional geometric tuning (coupler gaps, taper widths,
//! ring radii) where each parameter lives in a known physical range. The
//! swarm itself works in the unit hypercube; [`ParamBounds`] converts to and
//! from physical units.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"

mod bounds;
mod config;
mod runner;

pub use bounds::ParamBounds;
pub use config::PsoConfig;
pub use runner::{PsoResult, PsoRunner};
