//! Per-dimension parameter bounds for the continuous swarm.
//!
//! The swarm searches the unit hypercube; [`ParamBounds`] maps a normalized
//! position onto physical parameters (widths, gaps, radii, ...) with
//! `low + x·(high − low)`.

use crate::error::{OptError, Result};

/// One `(low, high)` pair per search dimension.
///
/// ```
/// use u_pixelopt::pso::ParamBounds;
///
/// let bounds = ParamBounds::new(vec![(0.0, 10.0), (-1.0, 1.0)]).unwrap();
/// assert_eq!(bounds.denormalize(&[0.5, 0.0]), vec![5.0, -1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")
)]
pub struct ParamBounds {
    pairs: Vec<(f64, f64)>,
}

impl ParamBounds {
    /// Builds bounds from `(low, high)` pairs.
    pub fn new(pairs: Vec<(f64, f64)>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(OptError::EmptyBounds);
        }
        for (index, &(low, high)) in pairs.iter().enumerate() {
            if !(low.is_finite() && high.is_finite()) || low > high {
                return Err(OptError::InvalidBound { index, low, high });
            }
        }
        Ok(Self { pairs })
    }

    /// Builds bounds from rows that must each hold exactly two values.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let pairs = rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row.as_ref() {
                &[low, high] => Ok((low, high)),
                other => Err(OptError::MalformedBounds {
                    index,
                    len: other.len(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(pairs)
    }

    /// Builds bounds from a flat `[low0, high0, low1, high1, ...]` slice.
    pub fn from_flat(values: &[f64]) -> Result<Self> {
        if values.len() % 2 != 0 {
            return Err(OptError::MalformedBounds {
                index: values.len() / 2,
                len: 1,
            });
        }
        Self::new(values.chunks_exact(2).map(|c| (c[0], c[1])).collect())
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    /// Maps a normalized position onto the bounds.
    ///
    /// # Panics
    /// Panics if `unit.len()` differs from the number of dimensions.
    pub fn denormalize(&self, unit: &[f64]) -> Vec<f64> {
        assert_eq!(unit.len(), self.len(), "dimension mismatch");
        unit.iter()
            .zip(&self.pairs)
            .map(|(&x, &(low, high))| low + x * (high - low))
            .collect()
    }

    /// Maps parameters back into `[0, 1]`. Degenerate ranges map to 0.
    ///
    /// # Panics
    /// Panics if `params.len()` differs from the number of dimensions.
    pub fn normalize(&self, params: &[f64]) -> Vec<f64> {
        assert_eq!(params.len(), self.len(), "dimension mismatch");
        params
            .iter()
            .zip(&self.pairs)
            .map(|(&p, &(low, high))| {
                let range = high - low;
                if range > 0.0 {
                    ((p - low) / range).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<(f64, f64)>> for ParamBounds {
    type Error = OptError;

    fn try_from(pairs: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(pairs)
    }
}

impl From<ParamBounds> for Vec<(f64, f64)> {
    fn from(bounds: ParamBounds) -> Self {
        bounds.pairs
    }
}
