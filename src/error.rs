//! Error types for wind statistics.

use thiserror::Error;

/// Errors reported by binning, sector aggregation, and Weibull fitting.
///
/// Every fallible operation either returns a complete result or one of
/// these variants. Nothing is clamped to a default on failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindError {
    /// Input violates a precondition (empty sequence, bad edges, bad sector count).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the violated precondition
        message: String,
    },

    /// An iterative estimator did not produce a solution.
    #[error("Fitting failure ({method}): {message}")]
    FittingFailure {
        /// Estimator that failed
        method: &'static str,
        /// Why it failed
        message: String,
    },

    /// The sample carries no usable information (all missing or all zero).
    #[error("Degenerate distribution: {message}")]
    DegenerateDistribution {
        /// Description of the degenerate input
        message: String,
    },
}

impl WindError {
    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a FittingFailure error.
    pub fn fitting_failure(method: &'static str, message: impl Into<String>) -> Self {
        Self::FittingFailure {
            method,
            message: message.into(),
        }
    }

    /// Create a DegenerateDistribution error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateDistribution {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = [
            (
                WindError::invalid_input("sectors must divide 360"),
                "Invalid input: sectors must divide 360",
            ),
            (
                WindError::fitting_failure("euro_atlas", "no root"),
                "Fitting failure (euro_atlas): no root",
            ),
            (
                WindError::degenerate("all samples missing"),
                "Degenerate distribution: all samples missing",
            ),
        ];
        for (err, expected) in errors {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_error_variants_match() {
        assert!(matches!(
            WindError::fitting_failure("least_squares", "x"),
            WindError::FittingFailure {
                method: "least_squares",
                ..
            }
        ));
    }
}
