//! Error types shared by every optimizer in the crate.
//!
//! Configuration problems are reported by the runner constructors before any
//! cost evaluation happens. Failures inside a caller-supplied cost function
//! are passed through untouched as the `source` of [`OptError::Evaluation`].

use thiserror::Error;

/// Boxed error returned by fallible cost functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while constructing or running an optimizer.
#[derive(Debug, Error)]
pub enum OptError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A user-supplied solution has the wrong length.
    #[error("solution length mismatch: expected {expected}, got {got}")]
    SolutionLengthMismatch {
        /// Configured solution length
        expected: usize,
        /// Length of the supplied solution
        got: usize,
    },

    /// A user-supplied binary solution contains a value other than 0 or 1.
    #[error("binary solution has value {value} at index {index} (must be 0 or 1)")]
    NonBinarySolution {
        /// Offending position
        index: usize,
        /// Offending value
        value: u8,
    },

    /// No parameter bounds were supplied.
    #[error("parameter bounds must not be empty")]
    EmptyBounds,

    /// A bounds entry is not a `(low, high)` pair.
    #[error("malformed bounds at index {index}: expected a (low, high) pair, got {len} values")]
    MalformedBounds {
        /// Index of the malformed entry
        index: usize,
        /// Number of values found in the entry
        len: usize,
    },

    /// A bounds pair is non-finite or has `low > high`.
    #[error("invalid bounds at index {index}: low ({low}) must be finite and <= high ({high})")]
    InvalidBound {
        /// Index of the invalid pair
        index: usize,
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
    },

    /// The dimensionality implied by the bounds disagrees with the config.
    #[error("dimension mismatch: bounds define {bounds} dimensions, config expects {expected}")]
    DimensionMismatch {
        /// Dimensions defined by the bounds
        bounds: usize,
        /// Dimensions named in the configuration
        expected: usize,
    },

    /// `run()` was called after the iteration budget had been consumed.
    #[error("iteration budget of {max_iterations} already exhausted; construct a new runner")]
    BudgetExhausted {
        /// The configured iteration budget
        max_iterations: usize,
    },

    /// The cost function returned an error.
    #[error("cost evaluation failed")]
    Evaluation(#[source] BoxError),
}

/// A specialized `Result` type for optimizer operations.
pub type Result<T> = std::result::Result<T, OptError>;

impl OptError {
    /// Returns `true` for errors raised while validating construction input.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            OptError::InvalidConfig(_)
                | OptError::SolutionLengthMismatch { .. }
                | OptError::NonBinarySolution { .. }
        ) || self.is_bounds_error()
    }

    /// Returns `true` for parameter-bounds errors.
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            OptError::EmptyBounds
                | OptError::MalformedBounds { .. }
                | OptError::InvalidBound { .. }
                | OptError::DimensionMismatch { .. }
        )
    }
}
