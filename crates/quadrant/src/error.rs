//! Error types for end-to-end runs.

use quadrant_backtest::BacktestError;
use quadrant_model::ModelError;
use quadrant_utils::UtilsError;

/// Errors raised by [`crate::Pipeline`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Ingestion failed.
    #[error("ingest error: {0}")]
    Utils(#[from] UtilsError),

    /// Component fitting or classification failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Backtest or metrics failed.
    #[error("backtest error: {0}")]
    Backtest(#[from] BacktestError),
}

impl PipelineError {
    /// Check if more or cleaner data could make the run succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Utils(_) => false,
            Self::Model(e) => e.is_recoverable(),
            Self::Backtest(e) => e.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_follows_source() {
        let err: PipelineError = BacktestError::NoOverlap { returns: 2, regimes: 3 }.into();
        assert!(err.is_recoverable());
        assert!(err.to_string().starts_with("backtest error"));

        let err: PipelineError = UtilsError::Empty("returns table").into();
        assert!(!err.is_recoverable());
    }
}
