//! Binary Genetic Algorithm.
//!
//! A population of bit strings evolves through fitness-proportionate
//! selection, single-point crossover and single-bit mutation. The whole
//! population is replaced each generation; the best individual ever seen is
//! written over the worst offspring so it is never lost.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, operator rates)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Snapshot of the best individual and the convergence curve
//!
//! # Submodules
//!
//! - [`operators`]: Bit-string crossover and mutation
//! - [`selection`]: Cost-to-weight conversion and roulette-wheel sampling
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
