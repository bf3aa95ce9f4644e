//! Helpers for 0/1-encoded solution vectors.

use crate::error::{OptError, Result};

/// Flips a 0/1 bit.
#[inline]
pub fn flip(bit: u8) -> u8 {
    1 - (bit & 1)
}

/// Checks that `solution` has length `expected` and holds only 0 and 1.
pub fn validate(solution: &[u8], expected: usize) -> Result<()> {
    if solution.len() != expected {
        return Err(OptError::SolutionLengthMismatch {
            expected,
            got: solution.len(),
        });
    }
    if let Some((index, &value)) = solution.iter().enumerate().find(|&(_, &b)| b > 1) {
        return Err(OptError::NonBinarySolution { index, value });
    }
    Ok(())
}

/// Number of positions at which two equal-length bit vectors differ.
pub fn hamming(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}
