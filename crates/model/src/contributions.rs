//! Variable-level decomposition of the latest component scores.

use ndarray::Array1;
use quadrant_primitives::{Date, FactorMatrix, LoadingTimeline, Regime, RegimeSeries};
use tracing::debug;

use crate::{ContributionConfig, ModelError, PrincipalComponentSeries};

/// Average contribution of one variable to PC1 and PC2.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableContribution {
    /// Variable name.
    pub variable: String,
    /// Mean `value x PC1 loading` over the window.
    pub pc1: f64,
    /// Mean `value x PC2 loading` over the window.
    pub pc2: f64,
}

/// Contributions as of the latest fully classified date.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentContributors {
    /// Latest date with both smoothed scores and a regime defined.
    pub as_of: Date,
    /// Regime at `as_of`.
    pub regime: Regime,
    /// Dates averaged over, oldest first.
    pub window: Vec<Date>,
    /// One entry per variable, in matrix column order.
    pub contributions: Vec<VariableContribution>,
}

impl CurrentContributors {
    /// Largest `n` PC1 contributions, most positive first.
    ///
    /// Ranking is by signed value, so variables pulling the score down sort last.
    #[must_use]
    pub fn top_pc1(&self, n: usize) -> Vec<&VariableContribution> {
        self.top_by(n, |c| c.pc1)
    }

    /// Largest `n` PC2 contributions, most positive first.
    #[must_use]
    pub fn top_pc2(&self, n: usize) -> Vec<&VariableContribution> {
        self.top_by(n, |c| c.pc2)
    }

    fn top_by(
        &self,
        n: usize,
        key: impl Fn(&VariableContribution) -> f64,
    ) -> Vec<&VariableContribution> {
        let mut ranked: Vec<&VariableContribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
        ranked.truncate(n);
        ranked
    }
}

/// Decompose the latest scores into per-variable contributions.
///
/// Finds the last date where both smoothed scores and the regime are
/// defined, takes up to `config.lookback` dates ending there, and averages
/// `standardized value x loading at that date` per variable. Dates with no
/// timeline entry are left out of the average.
///
/// # Returns
/// `None` if no date qualifies or no loading vector covers the window.
///
/// # Errors
/// Returns `ModelError::InvalidConfig` if the lookback is zero.
pub fn current_contributors(
    matrix: &FactorMatrix,
    series: &PrincipalComponentSeries,
    regimes: &RegimeSeries,
    timeline: &LoadingTimeline,
    config: &ContributionConfig,
) -> Result<Option<CurrentContributors>, ModelError> {
    if config.lookback == 0 {
        return Err(ModelError::InvalidConfig("lookback must be positive".to_string()));
    }

    let latest = (0..series.len()).rev().find_map(|i| {
        let (a, b) = series.smoothed(i);
        let date = series.dates[i];
        a.and(b).and(regimes.get(date)).map(|regime| (date, regime))
    });
    let Some((as_of, regime)) = latest else {
        return Ok(None);
    };
    let Some(end) = matrix.position(as_of) else {
        return Ok(None);
    };

    let start = (end + 1).saturating_sub(config.lookback);
    let k = matrix.n_variables();
    let mut pc1_sum = Array1::<f64>::zeros(k);
    let mut pc2_sum = Array1::<f64>::zeros(k);
    let mut window = Vec::with_capacity(end + 1 - start);

    for &date in &matrix.dates()[start..=end] {
        let (Some(loadings), Some(row)) = (timeline.get(date), matrix.row_at(date)) else {
            continue;
        };
        let loadings = loadings.reindex(matrix.variables());
        let (c1, c2) = loadings.contributions(row);
        pc1_sum += &c1;
        pc2_sum += &c2;
        window.push(date);
    }

    if window.is_empty() {
        return Ok(None);
    }

    let count = window.len() as f64;
    let contributions = matrix
        .variables()
        .iter()
        .enumerate()
        .map(|(j, name)| VariableContribution {
            variable: name.clone(),
            pc1: pc1_sum[j] / count,
            pc2: pc2_sum[j] / count,
        })
        .collect();

    debug!(%as_of, %regime, dates = window.len(), "computed current contributors");
    Ok(Some(CurrentContributors { as_of, regime, window, contributions }))
}
