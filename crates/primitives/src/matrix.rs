//! Standardized factor matrix (dates x variables).

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis, s};

use crate::{DataError, Date};

/// Time-ordered table of standardized macro variables, one row per month.
///
/// Missing observations are stored as `NaN`. The strict expanding PCA refuses
/// windows that contain them; the loading timeline drops them row-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorMatrix {
    dates: Vec<Date>,
    variables: Vec<String>,
    values: Array2<f64>,
}

impl FactorMatrix {
    /// Create a new factor matrix.
    ///
    /// # Errors
    /// Returns `DataError` if the shape disagrees with the labels, dates are
    /// not strictly increasing, or a variable name is repeated.
    pub fn new(
        dates: Vec<Date>,
        variables: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, DataError> {
        if values.nrows() != dates.len() {
            return Err(DataError::ShapeMismatch {
                expected: dates.len(),
                actual: values.nrows(),
                context: "factor matrix rows",
            });
        }
        if values.ncols() != variables.len() {
            return Err(DataError::ShapeMismatch {
                expected: variables.len(),
                actual: values.ncols(),
                context: "factor matrix columns",
            });
        }
        check_increasing(&dates)?;

        let mut seen = HashSet::with_capacity(variables.len());
        for name in &variables {
            if !seen.insert(name.as_str()) {
                return Err(DataError::DuplicateVariable(name.clone()));
            }
        }

        Ok(Self { dates, variables, values })
    }

    /// Number of dates.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.dates.len()
    }

    /// Number of variables.
    #[must_use]
    pub const fn n_variables(&self) -> usize {
        self.variables.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row timestamps.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Variable names in column order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Raw value matrix (n_rows x n_variables).
    #[must_use]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Rows `0..=end` of the value matrix.
    ///
    /// # Panics
    /// Panics if `end` is out of bounds.
    #[must_use]
    pub fn window(&self, end: usize) -> ArrayView2<'_, f64> {
        self.values.slice(s![..=end, ..])
    }

    /// Get the column index for a variable name.
    #[must_use]
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    /// Get a column by variable name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.variable_index(name).map(|j| self.values.column(j))
    }

    /// Get the row recorded at `date`.
    #[must_use]
    pub fn row_at(&self, date: Date) -> Option<ArrayView1<'_, f64>> {
        self.position(date).map(|i| self.values.row(i))
    }

    /// Position of `date` in the row index.
    #[must_use]
    pub fn position(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// First row index in `0..=end` holding a missing value, if any.
    ///
    /// # Panics
    /// Panics if `end` is out of bounds.
    #[must_use]
    pub fn first_missing_row(&self, end: usize) -> Option<usize> {
        self.window(end)
            .axis_iter(Axis(0))
            .position(|row| row.iter().any(|v| !v.is_finite()))
    }

    /// Matrix restricted to rows `0..=end`.
    #[must_use]
    pub fn truncated(&self, end: usize) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        let end = end.min(self.n_rows().saturating_sub(1));
        Self {
            dates: self.dates[..=end].to_vec(),
            variables: self.variables.clone(),
            values: self.values.slice(s![..=end, ..]).to_owned(),
        }
    }
}

pub(crate) fn check_increasing(dates: &[Date]) -> Result<(), DataError> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(DataError::UnorderedDates { previous: pair[0], next: pair[1] });
        }
    }
    Ok(())
}
