//! Black-box optimizers for pixelated photonic design.
//!
//! Tunes binary pixel maps or continuous geometric parameters against a
//! figure of merit supplied by the caller, typically the output of an
//! electromagnetic field solver:
//!
//! - **Direct Binary Search (DBS)**: Single-solution local search that
//!   sweeps every pixel in random order and keeps non-worsening flips.
//! - **Genetic Algorithm (GA)**: Binary GA with fitness-proportional
//!   selection, single-point crossover, bit-flip mutation and elitism.
//! - **Particle Swarm (PSO)**: Continuous swarm over box-bounded parameters,
//!   normalized to the unit hypercube.
//! - **Binary PSO (BPSO)**: Swarm over bit strings with S- or V-shaped
//!   transfer functions.
//! - **Binary Bat Algorithm**: Frequency-driven velocities with a
//!   loudness/pulse-rate acceptance gate.
//!
//! # Architecture
//!
//! Every algorithm follows the same shape: `XRunner::new(cost, config)`
//! validates the configuration and evaluates the starting point(s),
//! `run()` spends the iteration budget, and the caller reads back the best
//! solution, its cost and the [`ConvergenceCurve`]. The cost function is
//! any [`CostFunction`]; evaluation is serial and never retried. The crate
//! knows nothing about geometry or simulators, which live with the caller.

pub mod bat;
pub mod binary;
pub mod bpso;
pub mod convergence;
pub mod dbs;
pub mod error;
pub mod ga;
pub mod objective;
pub mod pso;
pub mod random;
pub mod swarm;
pub mod transfer;

pub use convergence::ConvergenceCurve;
pub use error::{OptError, Result};
pub use objective::{fallible, CostFunction, Progress};
