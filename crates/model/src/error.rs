//! Error types for the expanding PCA model.

use quadrant_math::MathError;
use quadrant_primitives::{DataError, Date};

/// Errors that can occur while fitting the regime model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Malformed container.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// A two-component decomposition needs at least two variables.
    #[error("need at least 2 variables, got {0}")]
    TooFewVariables(usize),

    /// The factor matrix has a gap inside a strict fit window.
    #[error("missing value in factor matrix at {date}")]
    MissingValues {
        /// First date holding a missing value.
        date: Date,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two series that must share an index do not.
    #[error("index mismatch: {0}")]
    IndexMismatch(String),
}

impl ModelError {
    /// Returns whether this error is recoverable.
    ///
    /// Gaps in the input can be filled upstream and the fit retried.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingValues { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::TooFewVariables(1);
        assert_eq!(err.to_string(), "need at least 2 variables, got 1");
    }

    #[test]
    fn error_is_recoverable() {
        let date = Date::from_ymd_opt(2024, 1, 31).unwrap();
        assert!(ModelError::MissingValues { date }.is_recoverable());
        assert!(!ModelError::InvalidConfig("sma_window".to_string()).is_recoverable());
    }

    #[test]
    fn error_from_math() {
        let err: ModelError = MathError::EmptyData.into();
        assert!(matches!(err, ModelError::Math(MathError::EmptyData)));
    }
}
