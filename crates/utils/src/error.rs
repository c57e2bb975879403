//! Error types for ingestion utilities.

use quadrant_primitives::{DataError, Date};

/// Errors that can occur while turning raw tables into model inputs.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Container validation failed.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// None of a series' aliases is present.
    #[error("could not resolve {series} series; available columns: {available:?}")]
    UnresolvedSeries {
        /// Canonical series name.
        series: &'static str,
        /// Columns that were searched.
        available: Vec<String>,
    },

    /// A return is outside the plausible range for a monthly fractional return.
    #[error("implausible {series} return {value} at {date}; expected fractional returns")]
    ImplausibleReturn {
        /// Series name.
        series: &'static str,
        /// Date of the value.
        date: Date,
        /// Offending value.
        value: f64,
    },

    /// Nothing left after cleaning.
    #[error("no usable rows in {0}")]
    Empty(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UtilsError::InvalidParameter("bad value".to_string());
        assert!(err.to_string().contains("bad value"));

        let err = UtilsError::UnresolvedSeries { series: "HY", available: vec!["X".to_string()] };
        assert!(err.to_string().contains("HY"));
    }
}
