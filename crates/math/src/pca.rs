//! Principal component analysis on a dense sample matrix.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{MathError, symmetric_eigen};

/// Principal component decomposition settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pca {
    /// Number of components to retain.
    pub n_components: usize,
}

/// A fitted decomposition.
#[derive(Debug, Clone)]
pub struct PcaFit {
    /// Column means removed before projection (n_features,).
    pub mean: Array1<f64>,
    /// Component loadings as rows (n_components x n_features).
    pub components: Array2<f64>,
    /// Variance captured by each retained component.
    pub explained_variance: Array1<f64>,
    /// Share of total variance captured by each retained component.
    ///
    /// `NaN` when the sample has zero total variance.
    pub explained_variance_ratio: Array1<f64>,
    /// Number of rows the fit saw.
    pub n_samples: usize,
}

impl Pca {
    /// Create a decomposition keeping `n_components` components.
    #[must_use]
    pub const fn new(n_components: usize) -> Self {
        Self { n_components }
    }

    /// Fit on `x` (n_samples x n_features), mean-centering internally.
    ///
    /// Each component's sign is fixed so that its largest-magnitude loading is
    /// positive, which makes repeated fits on identical data bit-identical.
    ///
    /// # Errors
    /// Returns error if fewer than two rows are given, more components are
    /// requested than `min(n_samples, n_features)`, or the data is not finite.
    pub fn fit(&self, x: ArrayView2<'_, f64>) -> Result<PcaFit, MathError> {
        let (n, k) = x.dim();
        if n < 2 {
            return Err(MathError::InsufficientData { required: 2, actual: n });
        }
        if self.n_components == 0 || self.n_components > n.min(k) {
            return Err(MathError::DimensionMismatch {
                expected: n.min(k),
                actual: self.n_components,
            });
        }

        let mean = x.mean_axis(Axis(0)).ok_or(MathError::EmptyData)?;
        let centered = &x - &mean;
        let covariance = centered.t().dot(&centered) / (n as f64 - 1.0);

        let eig = symmetric_eigen(&covariance)?;
        let total_variance: f64 = covariance.diag().sum();

        let mut components = Array2::zeros((self.n_components, k));
        for c in 0..self.n_components {
            let mut row = eig.vectors.column(c).to_owned();
            let pivot = row
                .iter()
                .enumerate()
                .fold(0, |best, (j, w)| if w.abs() > row[best].abs() { j } else { best });
            if row[pivot] < 0.0 {
                row.mapv_inplace(|w| -w);
            }
            components.row_mut(c).assign(&row);
        }

        let explained_variance =
            Array1::from_iter(eig.values.iter().take(self.n_components).map(|v| v.max(0.0)));
        let explained_variance_ratio = if total_variance > 0.0 {
            &explained_variance / total_variance
        } else {
            Array1::from_elem(self.n_components, f64::NAN)
        };

        Ok(PcaFit { mean, components, explained_variance, explained_variance_ratio, n_samples: n })
    }
}

impl PcaFit {
    /// Project rows of `x` onto the retained components.
    ///
    /// # Errors
    /// Returns error if `x` has a different number of features than the fit.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, MathError> {
        if x.ncols() != self.mean.len() {
            return Err(MathError::DimensionMismatch {
                expected: self.mean.len(),
                actual: x.ncols(),
            });
        }
        let centered = &x - &self.mean;
        Ok(centered.dot(&self.components.t()))
    }

    /// Number of retained components.
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }
}
