//! Expanding-window principal component engine.

use ndarray::Array2;
use polars::prelude::*;
use quadrant_math::{MathError, Pca, diff, rolling_mean};
use quadrant_primitives::{Date, FactorMatrix, LoadingVector};
use tracing::{debug, trace};

use crate::{Anchors, ExpandingPcaConfig, ModelError, Orientation};

/// Oriented two-component fit using rows `0..=t` of a factor matrix.
#[derive(Debug, Clone)]
pub struct CutoffFit {
    /// Cutoff date.
    pub date: Date,
    /// PC1 score at the cutoff.
    pub pc1: f64,
    /// PC2 score at the cutoff.
    pub pc2: f64,
    /// Explained-variance ratio of PC1 (`NaN` on a zero-variance window).
    pub pc1_evr: f64,
    /// Explained-variance ratio of PC2 (`NaN` on a zero-variance window).
    pub pc2_evr: f64,
    /// Oriented loadings over every variable.
    pub loadings: LoadingVector,
    /// Sign decisions applied on top of the raw fit.
    pub orientation: Orientation,
}

/// Per-date component scores, explained-variance ratios and smoothed scores.
///
/// Every field is aligned with `dates`; `None` marks an undefined value
/// (first row, insufficient smoothing history, zero-variance window).
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalComponentSeries {
    /// Row timestamps.
    pub dates: Vec<Date>,
    /// Risk-appetite score.
    pub pc1: Vec<Option<f64>>,
    /// Duration-demand score.
    pub pc2: Vec<Option<f64>>,
    /// PC1 explained-variance ratio.
    pub pc1_evr: Vec<Option<f64>>,
    /// PC2 explained-variance ratio.
    pub pc2_evr: Vec<Option<f64>>,
    /// Combined explained-variance ratio of both components.
    pub evr_total: Vec<Option<f64>>,
    /// Trailing mean of PC1.
    pub pc1_sma: Vec<Option<f64>>,
    /// Trailing mean of PC2.
    pub pc2_sma: Vec<Option<f64>>,
    /// First difference of PC2.
    pub dpc2: Vec<Option<f64>>,
    /// Smoothing window used for `pc1_sma`/`pc2_sma`.
    pub sma_window: usize,
}

impl PrincipalComponentSeries {
    /// Number of dates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Position of `date` in the index.
    #[must_use]
    pub fn position(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Smoothed `(PC1, PC2)` at row `i`.
    #[must_use]
    pub fn smoothed(&self, i: usize) -> (Option<f64>, Option<f64>) {
        (self.pc1_sma.get(i).copied().flatten(), self.pc2_sma.get(i).copied().flatten())
    }

    /// Convert to a DataFrame with one row per date.
    ///
    /// # Errors
    /// Returns error if the frame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame, ModelError> {
        let w = self.sma_window;
        let df = DataFrame::new(vec![
            Column::new("date".into(), self.dates.clone()),
            Column::new("PC1".into(), self.pc1.clone()),
            Column::new("PC2".into(), self.pc2.clone()),
            Column::new("PC1_EVR".into(), self.pc1_evr.clone()),
            Column::new("PC2_EVR".into(), self.pc2_evr.clone()),
            Column::new("EVR_1_2_sum".into(), self.evr_total.clone()),
            Column::new(format!("PC1_SMA{w}").into(), self.pc1_sma.clone()),
            Column::new(format!("PC2_SMA{w}").into(), self.pc2_sma.clone()),
            Column::new("dPC2".into(), self.dpc2.clone()),
        ])?;
        Ok(df)
    }
}

/// Result of a full expanding run.
#[derive(Debug, Clone)]
pub struct ExpandingPcaOutput {
    /// Per-date scores and derived fields.
    pub series: PrincipalComponentSeries,
    /// Oriented loadings at the final cutoff; `None` with fewer than two rows.
    pub loadings: Option<LoadingVector>,
}

/// Causal two-component PCA, refitted from scratch at every cutoff.
///
/// The score published for date `t` comes from a decomposition that saw
/// rows `0..=t` only, so running on a truncated matrix reproduces every
/// earlier value exactly.
#[derive(Debug, Clone)]
pub struct ExpandingPca {
    config: ExpandingPcaConfig,
    pca: Pca,
}

impl ExpandingPca {
    /// Create a new engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExpandingPcaConfig::default())
    }

    /// Create a new engine with custom configuration.
    #[must_use]
    pub const fn with_config(config: ExpandingPcaConfig) -> Self {
        Self { config, pca: Pca::new(2) }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExpandingPcaConfig {
        &self.config
    }

    /// Fit every cutoff of `matrix`.
    ///
    /// # Errors
    /// Returns `ModelError` if the configuration is invalid, the matrix has
    /// fewer than two variables, or it holds a missing value.
    pub fn fit(&self, matrix: &FactorMatrix) -> Result<ExpandingPcaOutput, ModelError> {
        let anchors = self.prepare(matrix, matrix.n_rows().saturating_sub(1))?;
        let n = matrix.n_rows();
        debug!(rows = n, variables = matrix.n_variables(), "fitting expanding PCA");

        let mut pc1 = vec![None; n];
        let mut pc2 = vec![None; n];
        let mut pc1_evr = vec![None; n];
        let mut pc2_evr = vec![None; n];
        let mut loadings = None;
        let mut flips = 0_usize;

        for t in 1..n {
            let cut = self.fit_window(matrix, t, anchors)?;
            pc1[t] = Some(cut.pc1);
            pc2[t] = Some(cut.pc2);
            pc1_evr[t] = Some(cut.pc1_evr).filter(|v| v.is_finite());
            pc2_evr[t] = Some(cut.pc2_evr).filter(|v| v.is_finite());
            flips += usize::from(cut.orientation.pc1_flipped)
                + usize::from(cut.orientation.pc2_flipped);
            if t == n - 1 {
                loadings = Some(cut.loadings);
            }
        }

        let evr_total =
            pc1_evr.iter().zip(&pc2_evr).map(|(a, b)| a.zip(*b).map(|(a, b)| a + b)).collect();
        let w = self.config.sma_window;
        let series = PrincipalComponentSeries {
            dates: matrix.dates().to_vec(),
            pc1_sma: rolling_mean(&pc1, w),
            pc2_sma: rolling_mean(&pc2, w),
            dpc2: diff(&pc2),
            pc1,
            pc2,
            pc1_evr,
            pc2_evr,
            evr_total,
            sma_window: w,
        };

        debug!(cutoffs = n.saturating_sub(1), flips, "expanding PCA complete");
        Ok(ExpandingPcaOutput { series, loadings })
    }

    /// Fit a single cutoff using rows `0..=t`.
    ///
    /// # Errors
    /// Returns `ModelError` if `t` is zero or out of range, or the window is
    /// not a valid input for [`Self::fit`].
    pub fn fit_at(&self, matrix: &FactorMatrix, t: usize) -> Result<CutoffFit, ModelError> {
        if t >= matrix.n_rows() {
            return Err(ModelError::IndexMismatch(format!(
                "cutoff {t} beyond {} rows",
                matrix.n_rows()
            )));
        }
        if t == 0 {
            return Err(MathError::InsufficientData { required: 2, actual: 1 }.into());
        }
        let anchors = self.prepare(matrix, t)?;
        self.fit_window(matrix, t, anchors)
    }

    fn prepare(&self, matrix: &FactorMatrix, end: usize) -> Result<Anchors, ModelError> {
        self.config.validate()?;
        if matrix.n_variables() < 2 {
            return Err(ModelError::TooFewVariables(matrix.n_variables()));
        }
        if !matrix.is_empty()
            && let Some(row) = matrix.first_missing_row(end)
        {
            return Err(ModelError::MissingValues { date: matrix.dates()[row] });
        }
        Ok(Anchors::resolve(matrix.variables(), &self.config))
    }

    fn fit_window(
        &self,
        matrix: &FactorMatrix,
        t: usize,
        anchors: Anchors,
    ) -> Result<CutoffFit, ModelError> {
        let window = matrix.window(t);
        let fit = self.pca.fit(window)?;
        let mut scores: Array2<f64> = fit.transform(window)?;
        let mut components = fit.components;

        let orientation = Orientation::decide(
            scores.view(),
            Some(window.column(anchors.equity)),
            Some(window.column(anchors.yields)),
        );
        orientation.apply(&mut scores, &mut components);
        trace!(cutoff = t, ?orientation, "fitted cutoff");

        Ok(CutoffFit {
            date: matrix.dates()[t],
            pc1: scores[[t, 0]],
            pc2: scores[[t, 1]],
            pc1_evr: fit.explained_variance_ratio[0],
            pc2_evr: fit.explained_variance_ratio[1],
            loadings: LoadingVector::new(
                matrix.variables().to_vec(),
                components.row(0).to_owned(),
                components.row(1).to_owned(),
            ),
            orientation,
        })
    }
}

impl Default for ExpandingPca {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    fn matrix() -> FactorMatrix {
        let dates = (1..=7)
            .map(|m| quadrant_primitives::month_end(Date::from_ymd_opt(2023, m, 1).unwrap()))
            .collect();
        let variables = vec!["SPX Index".to_string(), "US10Y".to_string(), "DXY".to_string()];
        let values = array![
            [0.1, 0.5, -0.2],
            [0.4, 0.2, 0.1],
            [-0.3, 0.9, 0.4],
            [0.8, -0.4, -0.5],
            [1.1, -0.2, 0.3],
            [-0.6, 1.2, 0.0],
            [0.5, 0.1, -0.7],
        ];
        FactorMatrix::new(dates, variables, values).unwrap()
    }

    #[test]
    fn first_row_undefined() {
        let out = ExpandingPca::new().fit(&matrix()).unwrap();
        let s = &out.series;

        assert_eq!(s.len(), 7);
        assert!(s.pc1[0].is_none() && s.pc2[0].is_none() && s.pc1_evr[0].is_none());
        assert!(s.pc1[1..].iter().all(Option::is_some));
        assert!(s.dpc2[1].is_none());
        assert!(s.dpc2[2].is_some());
    }

    #[test]
    fn smoothing_starts_after_window() {
        let out = ExpandingPca::new().fit(&matrix()).unwrap();
        let s = &out.series;

        // PC defined from row 1, so five consecutive values first exist at row 5.
        assert!(s.pc1_sma[..5].iter().all(Option::is_none));
        let expected = s.pc1[1..=5].iter().flatten().sum::<f64>() / 5.0;
        assert_relative_eq!(s.pc1_sma[5].unwrap(), expected, epsilon = 1e-12);
        assert_eq!(s.smoothed(5).1, s.pc2_sma[5]);
    }

    #[test]
    fn evr_total_is_sum() {
        let out = ExpandingPca::new().fit(&matrix()).unwrap();
        let s = &out.series;
        for t in 1..s.len() {
            let total = s.pc1_evr[t].unwrap() + s.pc2_evr[t].unwrap();
            assert_relative_eq!(s.evr_total[t].unwrap(), total, epsilon = 1e-12);
            assert!(total <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn final_loadings_match_last_cutoff() {
        let m = matrix();
        let engine = ExpandingPca::new();
        let out = engine.fit(&m).unwrap();
        let last = engine.fit_at(&m, 6).unwrap();

        assert_eq!(out.loadings.as_ref(), Some(&last.loadings));
        assert_eq!(out.series.pc1[6], Some(last.pc1));
    }

    #[test]
    fn fit_at_rejects_first_row() {
        assert!(ExpandingPca::new().fit_at(&matrix(), 0).is_err());
        assert!(ExpandingPca::new().fit_at(&matrix(), 7).is_err());
    }

    #[test]
    fn single_variable_rejected() {
        let m = FactorMatrix::new(
            vec![Date::from_ymd_opt(2024, 1, 31).unwrap()],
            vec!["A".to_string()],
            array![[1.0]],
        )
        .unwrap();
        assert!(matches!(ExpandingPca::new().fit(&m), Err(ModelError::TooFewVariables(1))));
    }

    #[test]
    fn missing_value_rejected() {
        let m = matrix();
        let mut values = m.values().to_owned();
        values[[3, 1]] = f64::NAN;
        let m = FactorMatrix::new(m.dates().to_vec(), m.variables().to_vec(), values).unwrap();

        let err = ExpandingPca::new().fit(&m).unwrap_err();
        assert!(matches!(err, ModelError::MissingValues { date } if date == m.dates()[3]));
        assert!(ExpandingPca::new().fit_at(&m, 2).is_ok());
    }

    #[test]
    fn short_matrices() {
        let empty = FactorMatrix::new(vec![], vec!["A".into(), "B".into()], Array2::zeros((0, 2)))
            .unwrap();
        let out = ExpandingPca::new().fit(&empty).unwrap();
        assert!(out.series.is_empty());
        assert!(out.loadings.is_none());

        let one = matrix().truncated(0);
        let out = ExpandingPca::new().fit(&one).unwrap();
        assert_eq!(out.series.len(), 1);
        assert!(out.loadings.is_none());
    }

    #[test]
    fn dataframe_view() {
        let out = ExpandingPca::new().fit(&matrix()).unwrap();
        let df = out.series.to_dataframe().unwrap();
        assert_eq!(df.height(), 7);
        assert!(df.column("PC1_SMA5").is_ok());
        assert_eq!(df.column("PC1").unwrap().null_count(), 1);
    }
}
