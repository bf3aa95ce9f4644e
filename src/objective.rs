//! The contract between the runners and the caller's figure of merit.
//!
//! A [`CostFunction`] maps one candidate solution to a scalar cost, lower
//! being better. The runners call it serially on their own thread and never
//! retry: a returned error aborts the current `new()` or `run()` call.
//!
//! Any closure `FnMut(&[T]) -> f64` is a cost function. Closures that can
//! fail (e.g. because an external field solver crashed) are adapted with
//! [`fallible`].
//!
//! ```
//! use u_pixelopt::objective::{fallible, CostFunction};
//!
//! let mut ones = |s: &[u8]| -(s.iter().filter(|&&b| b == 1).count() as f64);
//! assert_eq!(ones.cost(&[1u8, 0, 1]).unwrap(), -2.0);
//!
//! let mut checked = fallible(|s: &[f64]| {
//!     if s[0].is_nan() {
//!         Err("nan parameter")
//!     } else {
//!         Ok(s[0] * s[0])
//!     }
//! });
//! assert!(checked.cost(&[f64::NAN]).is_err());
//! ```

use crate::error::{BoxError, OptError, Result};

/// A black-box cost evaluated over solutions with elements of type `T`.
pub trait CostFunction<T> {
    /// Returns the cost of `solution`. Lower is better.
    fn cost(&mut self, solution: &[T]) -> std::result::Result<f64, BoxError>;
}

impl<T, F> CostFunction<T> for F
where
    F: FnMut(&[T]) -> f64,
{
    fn cost(&mut self, solution: &[T]) -> std::result::Result<f64, BoxError> {
        Ok(self(solution))
    }
}

/// Adapter turning a fallible closure into a [`CostFunction`].
///
/// Created by [`fallible`].
#[derive(Debug, Clone)]
pub struct Fallible<F>(F);

/// Wraps a closure returning `Result<f64, E>` as a cost function.
pub fn fallible<F>(f: F) -> Fallible<F> {
    Fallible(f)
}

impl<T, F, E> CostFunction<T> for Fallible<F>
where
    F: FnMut(&[T]) -> std::result::Result<f64, E>,
    E: Into<BoxError>,
{
    fn cost(&mut self, solution: &[T]) -> std::result::Result<f64, BoxError> {
        (self.0)(solution).map_err(Into::into)
    }
}

/// Snapshot handed to population-based callbacks once per iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Iterations completed so far (1-based after the first iteration).
    pub iteration: usize,
    /// Cost evaluations performed so far, including the initial pass.
    pub evaluations: usize,
    /// Best cost seen so far.
    pub best_cost: f64,
}

/// Observer invoked by a runner. Receives a variant-specific progress value.
pub type Callback<'a, P> = Box<dyn FnMut(&P) + 'a>;

pub(crate) fn evaluate<T, C>(cost: &mut C, solution: &[T]) -> Result<f64>
where
    C: CostFunction<T> + ?Sized,
{
    cost.cost(solution).map_err(OptError::Evaluation)
}
