//! Error types for the backtest.

use quadrant_primitives::DataError;

/// Errors that can occur while running or measuring a backtest.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    /// Malformed container.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Returns and regimes share no date.
    #[error("returns ({returns} dates) and regimes ({regimes} dates) do not overlap")]
    NoOverlap {
        /// Number of return dates.
        returns: usize,
        /// Number of regime dates.
        regimes: usize,
    },

    /// Two series that must be aligned have different lengths.
    #[error("length mismatch: strategy has {strategy} periods, benchmark has {benchmark}")]
    LengthMismatch {
        /// Strategy length.
        strategy: usize,
        /// Benchmark length.
        benchmark: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BacktestError {
    /// Returns whether this error is recoverable.
    ///
    /// Non-overlapping inputs may line up once more history arrives.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoOverlap { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BacktestError::LengthMismatch { strategy: 12, benchmark: 11 };
        assert_eq!(
            err.to_string(),
            "length mismatch: strategy has 12 periods, benchmark has 11"
        );
    }

    #[test]
    fn error_is_recoverable() {
        assert!(BacktestError::NoOverlap { returns: 3, regimes: 4 }.is_recoverable());
        assert!(!BacktestError::InvalidConfig("window".to_string()).is_recoverable());
    }
}
