//! Model configuration.

use crate::ModelError;

/// Equity-like variables tried in order when orienting PC1.
pub const DEFAULT_EQUITY_ANCHORS: [&str; 6] =
    ["MSCI World", "SPX Index", "SXXP Index", "MXEF Index", "HSI Index", "TPX Index"];

/// Yield-like variables tried in order when orienting PC2.
pub const DEFAULT_YIELD_ANCHORS: [&str; 6] =
    ["USGG10Y Index", "USGG10YR Index", "USGG10", "US10Y", "GUKG10 Index", "GTDEM10Y Govt"];

/// Configuration for the expanding PCA engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandingPcaConfig {
    /// Candidate PC1 anchors, first match wins; falls back to the first column.
    pub equity_anchors: Vec<String>,
    /// Candidate PC2 anchors, first match wins; falls back to the first column.
    pub yield_anchors: Vec<String>,
    /// Trailing window for the smoothed scores.
    pub sma_window: usize,
}

impl Default for ExpandingPcaConfig {
    fn default() -> Self {
        Self {
            equity_anchors: DEFAULT_EQUITY_ANCHORS.iter().map(|s| (*s).to_string()).collect(),
            yield_anchors: DEFAULT_YIELD_ANCHORS.iter().map(|s| (*s).to_string()).collect(),
            sma_window: 5,
        }
    }
}

impl ExpandingPcaConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` if the smoothing window is zero.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.sma_window == 0 {
            return Err(ModelError::InvalidConfig("sma_window must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the current-contributor decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionConfig {
    /// Maximum number of trailing dates averaged.
    pub lookback: usize,
}

impl Default for ContributionConfig {
    fn default() -> Self {
        Self { lookback: 5 }
    }
}
