//! Expanding z-scores for raw variable tables.

use ndarray::{Array2, Axis};
use quadrant_primitives::FactorMatrix;
use tracing::debug;

use crate::UtilsError;

/// Ingestion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Observations required before a z-score is defined.
    pub min_periods_for_zscore: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { min_periods_for_zscore: 24 }
    }
}

impl IngestConfig {
    /// Accepted range for `min_periods_for_zscore`.
    pub const MIN_PERIODS_RANGE: std::ops::RangeInclusive<usize> = 6..=120;

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `UtilsError::InvalidParameter` if `min_periods_for_zscore` is outside 6..=120.
    pub fn validate(&self) -> Result<(), UtilsError> {
        if !Self::MIN_PERIODS_RANGE.contains(&self.min_periods_for_zscore) {
            return Err(UtilsError::InvalidParameter(format!(
                "min_periods_for_zscore must be within 6..=120, got {}",
                self.min_periods_for_zscore
            )));
        }
        Ok(())
    }
}

/// Standardize each column by its expanding mean and population standard deviation.
///
/// Columns with no observations are dropped first, then rows with any gap.
/// The score at row `t` uses rows `0..=t` only and is defined once
/// `min_periods_for_zscore` rows are available. Rows with any undefined or
/// non-finite score are dropped from the result.
///
/// # Errors
/// Returns error if the configuration is invalid or no row has a full set of scores.
pub fn expanding_zscores(
    raw: &FactorMatrix,
    config: &IngestConfig,
) -> Result<FactorMatrix, UtilsError> {
    config.validate()?;
    let values = raw.values();

    let cols: Vec<usize> = (0..raw.n_variables())
        .filter(|&j| values.column(j).iter().any(|v| v.is_finite()))
        .collect();
    let rows: Vec<usize> = (0..raw.n_rows())
        .filter(|&i| cols.iter().all(|&j| values[[i, j]].is_finite()))
        .collect();
    let clean = values.select(Axis(0), &rows).select(Axis(1), &cols);

    let (n, k) = clean.dim();
    let mut mean = vec![0.0; k];
    let mut m2 = vec![0.0; k];
    let mut z = Array2::from_elem((n, k), f64::NAN);

    // Welford running moments per column.
    for i in 0..n {
        let count = (i + 1) as f64;
        for j in 0..k {
            let x = clean[[i, j]];
            let delta = x - mean[j];
            mean[j] += delta / count;
            m2[j] += delta * (x - mean[j]);
            if i + 1 >= config.min_periods_for_zscore {
                let sd = (m2[j] / count).sqrt();
                z[[i, j]] = (x - mean[j]) / sd;
            }
        }
    }

    let keep: Vec<usize> =
        (0..n).filter(|&i| z.row(i).iter().all(|v| v.is_finite())).collect();
    if keep.is_empty() {
        return Err(UtilsError::Empty("z-scored factor table"));
    }
    let dates = keep.iter().map(|&i| raw.dates()[rows[i]]).collect();
    let variables = cols.iter().map(|&j| raw.variables()[j].clone()).collect();
    let z = z.select(Axis(0), &keep);

    debug!(
        input_rows = raw.n_rows(),
        scored_rows = keep.len(),
        min_periods = config.min_periods_for_zscore,
        "computed expanding z-scores"
    );
    Ok(FactorMatrix::new(dates, variables, z)?)
}
