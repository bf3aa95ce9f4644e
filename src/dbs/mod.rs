//! Direct Binary Search (DBS).
//!
//! A single-solution local search over a binary pixel map. Every sweep tries
//! flipping each pixel exactly once, in random order, and keeps the flip
//! whenever the figure of merit does not get worse.
//!
//! # References
//!
//! - Seldowitz, Allebach & Sweeney (1987), "Synthesis of digital holograms by
//!   direct binary search"
//! - Shen, Wang, Menon & Polson (2015), "An integrated-nanophotonics
//!   polarization beamsplitter with 2.4 × 2.4 μm² footprint"

mod config;
mod runner;

pub use config::DbsConfig;
pub use runner::{DbsProgress, DbsResult, DbsRunner};
