//! Binary Particle Swarm Optimization (BPSO).
//!
//! Particles are bit strings. Each keeps a real-valued velocity per bit,
//! updated with the usual swarm rule; a [`TransferFunction`] then turns the
//! velocity into the next bit.
//!
//! # References
//!
//! - Kennedy & Eberhart (1997), "A Discrete Binary Version of the Particle
//!   Swarm Algorithm"
//! - Mirjalili & Lewis (2013), "S-shaped versus V-shaped transfer functions
//!   for binary Particle Swarm Optimization"

mod config;
mod runner;

pub use crate::transfer::TransferFunction;
pub use config::BpsoConfig;
pub use runner::{BpsoResult, BpsoRunner};
