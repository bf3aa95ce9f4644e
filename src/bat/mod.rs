//! Binary Bat Algorithm.
//!
//! Each bat carries a bit string and a real-valued velocity. Velocities are
//! driven by a random frequency and the distance to the best bat; a V-shaped
//! transfer turns them into bit flips. A pulse-rate step pulls bits back to
//! the best bat, and a loudness gate decides whether an improved trial
//! replaces the bat.
//!
//! # References
//!
//! - Yang (2010), "A New Metaheuristic Bat-Inspired Algorithm"
//! - Mirjalili, Mirjalili & Yang (2014), "Binary bat algorithm"

mod config;
mod runner;

pub use config::BatConfig;
pub use runner::{BatResult, BatRunner};
