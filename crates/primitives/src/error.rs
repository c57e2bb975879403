//! Error types for constructing primitive containers.

/// Structural problems detected while building a primitive container.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Two parallel collections disagree in length.
    #[error("shape mismatch for {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
        /// What was being measured.
        context: &'static str,
    },

    /// Timestamps are not strictly increasing.
    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedDates {
        /// Earlier position's date.
        previous: crate::Date,
        /// Later position's date.
        next: crate::Date,
    },

    /// The same variable name appears twice.
    #[error("duplicate variable: {0}")]
    DuplicateVariable(String),

    /// A value that must be finite is NaN or infinite.
    #[error("non-finite value in {series} at {date}")]
    NonFinite {
        /// Series name.
        series: &'static str,
        /// Date of the offending value.
        date: crate::Date,
    },

    /// A regime label could not be parsed.
    #[error("unknown regime label: {0}")]
    UnknownRegime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DataError::ShapeMismatch { expected: 3, actual: 2, context: "returns" };
        assert_eq!(err.to_string(), "shape mismatch for returns: expected 3, got 2");

        let err = DataError::DuplicateVariable("SPX Index".to_string());
        assert!(err.to_string().contains("SPX Index"));
    }
}
