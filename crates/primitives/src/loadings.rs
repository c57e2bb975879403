//! Principal component loading vectors.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayView1};

use crate::Date;

/// PC1/PC2 weights per variable, as of one fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingVector {
    /// Variable names.
    pub variables: Vec<String>,
    /// PC1 (risk appetite) weights.
    pub pc1: Array1<f64>,
    /// PC2 (duration demand) weights.
    pub pc2: Array1<f64>,
}

impl LoadingVector {
    /// Create a new loading vector.
    #[must_use]
    pub fn new(variables: Vec<String>, pc1: Array1<f64>, pc2: Array1<f64>) -> Self {
        debug_assert_eq!(variables.len(), pc1.len());
        debug_assert_eq!(variables.len(), pc2.len());
        Self { variables, pc1, pc2 }
    }

    /// Number of variables.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Get `(pc1, pc2)` weights for a variable.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<(f64, f64)> {
        self.variables.iter().position(|v| v == variable).map(|i| (self.pc1[i], self.pc2[i]))
    }

    /// Re-express over `universe`, giving zero weight to variables this vector lacks.
    #[must_use]
    pub fn reindex(&self, universe: &[String]) -> Self {
        let (pc1, pc2): (Vec<f64>, Vec<f64>) =
            universe.iter().map(|name| self.get(name).unwrap_or((0.0, 0.0))).unzip();
        Self::new(universe.to_vec(), Array1::from_vec(pc1), Array1::from_vec(pc2))
    }

    /// Elementwise `value x weight` for both components.
    ///
    /// `values` must be aligned with [`Self::variables`]; missing values count as zero.
    #[must_use]
    pub fn contributions(&self, values: ArrayView1<'_, f64>) -> (Array1<f64>, Array1<f64>) {
        let z = values.mapv(|v| if v.is_finite() { v } else { 0.0 });
        (&z * &self.pc1, &z * &self.pc2)
    }
}

/// Per-date loading vectors, each fitted only on data through its date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingTimeline {
    entries: BTreeMap<Date, LoadingVector>,
}

impl LoadingTimeline {
    /// Create an empty timeline.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Record the loading vector fitted through `date`, replacing any earlier entry.
    pub fn insert(&mut self, date: Date, loadings: LoadingVector) {
        self.entries.insert(date, loadings);
    }

    /// Loading vector for `date`.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&LoadingVector> {
        self.entries.get(&date)
    }

    /// Number of dated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Date, &LoadingVector)> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<(&Date, &LoadingVector)> {
        self.entries.iter().next_back()
    }
}
