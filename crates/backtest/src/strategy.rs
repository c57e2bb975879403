//! Regime-switching allocation between the HY and IG sleeves.

use polars::prelude::*;
use quadrant_math::cumulative_product;
use quadrant_primitives::{Date, Regime, RegimeSeries, ReturnsTable, Sleeve};
use quadrant_traits::AllocationRule;
use serde::Serialize;
use tracing::debug;

use crate::{BacktestError, drawdown};

/// Fully in high yield when the lagged regime is risk-on, else fully in investment grade.
///
/// An undefined signal counts as risk-off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskOnSwitch;

impl AllocationRule for RiskOnSwitch {
    fn hy_weight(&self, signal: Option<Regime>) -> f64 {
        if signal.is_some_and(Regime::is_risk_on) { 1.0 } else { 0.0 }
    }

    fn name(&self) -> &str {
        "risk_on_switch"
    }
}

/// Per-date backtest output over the dates shared by returns and regimes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    /// Common dates, ascending.
    pub dates: Vec<Date>,
    /// Regime at each date.
    pub regimes: Vec<Option<Regime>>,
    /// Regime at the previous common date; the first entry is always `None`.
    pub signals: Vec<Option<Regime>>,
    /// Weight on the HY sleeve.
    pub hy_weights: Vec<f64>,
    /// Dominant sleeve.
    pub sleeves: Vec<Sleeve>,
    /// HY sleeve returns.
    pub hy_returns: Vec<f64>,
    /// IG sleeve returns.
    pub ig_returns: Vec<f64>,
    /// Strategy returns.
    pub strategy_returns: Vec<f64>,
    /// Benchmark (EMBI) returns.
    pub benchmark_returns: Vec<f64>,
    /// Strategy growth of 1.0.
    pub cumulative_strategy: Vec<f64>,
    /// Benchmark growth of 1.0.
    pub cumulative_benchmark: Vec<f64>,
    /// Strategy drawdown from running peak.
    pub drawdown_strategy: Vec<f64>,
    /// Benchmark drawdown from running peak.
    pub drawdown_benchmark: Vec<f64>,
}

impl BacktestResult {
    /// Number of periods.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Compounded strategy return over the whole sample.
    #[must_use]
    pub fn total_strategy_return(&self) -> f64 {
        self.cumulative_strategy.last().map_or(0.0, |c| c - 1.0)
    }

    /// Compounded benchmark return over the whole sample.
    #[must_use]
    pub fn total_benchmark_return(&self) -> f64 {
        self.cumulative_benchmark.last().map_or(0.0, |c| c - 1.0)
    }

    /// Deepest strategy drawdown (non-positive).
    #[must_use]
    pub fn max_drawdown_strategy(&self) -> f64 {
        self.drawdown_strategy.iter().copied().fold(0.0, f64::min)
    }

    /// Deepest benchmark drawdown (non-positive).
    #[must_use]
    pub fn max_drawdown_benchmark(&self) -> f64 {
        self.drawdown_benchmark.iter().copied().fold(0.0, f64::min)
    }

    /// Convert to a DataFrame with one row per date.
    ///
    /// # Errors
    /// Returns error if the frame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame, BacktestError> {
        let label = |r: &Option<Regime>| r.map(Regime::as_str);
        let df = DataFrame::new(vec![
            Column::new("date".into(), self.dates.clone()),
            Column::new("regime".into(), self.regimes.iter().map(label).collect::<Vec<_>>()),
            Column::new("signal".into(), self.signals.iter().map(label).collect::<Vec<_>>()),
            Column::new("w_hy".into(), self.hy_weights.clone()),
            Column::new(
                "sleeve".into(),
                self.sleeves.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ),
            Column::new("strat_ret".into(), self.strategy_returns.clone()),
            Column::new("bench_ret".into(), self.benchmark_returns.clone()),
            Column::new("cum_strat".into(), self.cumulative_strategy.clone()),
            Column::new("cum_bench".into(), self.cumulative_benchmark.clone()),
            Column::new("dd_strat".into(), self.drawdown_strategy.clone()),
            Column::new("dd_bench".into(), self.drawdown_benchmark.clone()),
        ])?;
        Ok(df)
    }
}

/// One date present in both the returns table and the regime series.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AlignedPeriod {
    pub(crate) date: Date,
    pub(crate) hy: f64,
    pub(crate) ig: f64,
    pub(crate) embi: f64,
    pub(crate) regime: Option<Regime>,
}

/// Walk both date-sorted inputs and keep their common dates.
pub(crate) fn align(returns: &ReturnsTable, regimes: &RegimeSeries) -> Vec<AlignedPeriod> {
    let (rd, gd) = (returns.dates(), regimes.dates());
    let mut out = Vec::with_capacity(rd.len().min(gd.len()));
    let (mut i, mut j) = (0, 0);
    while i < rd.len() && j < gd.len() {
        match rd[i].cmp(&gd[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(AlignedPeriod {
                    date: rd[i],
                    hy: returns.hy()[i],
                    ig: returns.ig()[i],
                    embi: returns.embi()[i],
                    regime: regimes.labels()[j],
                });
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Lagged regime-switching backtest.
#[derive(Debug, Clone)]
pub struct Backtest<R = RiskOnSwitch> {
    rule: R,
}

impl Backtest {
    /// Create a backtest using [`RiskOnSwitch`].
    #[must_use]
    pub const fn new() -> Self {
        Self { rule: RiskOnSwitch }
    }
}

impl Default for Backtest {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AllocationRule> Backtest<R> {
    /// Create a backtest driven by a custom rule.
    #[must_use]
    pub const fn with_rule(rule: R) -> Self {
        Self { rule }
    }

    /// Get the allocation rule.
    #[must_use]
    pub const fn rule(&self) -> &R {
        &self.rule
    }

    /// Run over the dates common to `returns` and `regimes`.
    ///
    /// The weight at each date depends only on the regime at the previous
    /// common date; the first date uses an undefined signal.
    ///
    /// # Errors
    /// Returns `BacktestError::NoOverlap` if the inputs share no date.
    pub fn run(
        &self,
        returns: &ReturnsTable,
        regimes: &RegimeSeries,
    ) -> Result<BacktestResult, BacktestError> {
        let periods = align(returns, regimes);
        if periods.is_empty() {
            return Err(BacktestError::NoOverlap {
                returns: returns.len(),
                regimes: regimes.len(),
            });
        }

        let n = periods.len();
        let mut result = BacktestResult {
            dates: Vec::with_capacity(n),
            regimes: Vec::with_capacity(n),
            signals: Vec::with_capacity(n),
            hy_weights: Vec::with_capacity(n),
            sleeves: Vec::with_capacity(n),
            hy_returns: Vec::with_capacity(n),
            ig_returns: Vec::with_capacity(n),
            strategy_returns: Vec::with_capacity(n),
            benchmark_returns: Vec::with_capacity(n),
            cumulative_strategy: Vec::new(),
            cumulative_benchmark: Vec::new(),
            drawdown_strategy: Vec::new(),
            drawdown_benchmark: Vec::new(),
        };

        let mut signal = None;
        for p in &periods {
            let w_hy = self.rule.hy_weight(signal);
            let w_ig = self.rule.ig_weight(signal);

            result.dates.push(p.date);
            result.regimes.push(p.regime);
            result.signals.push(signal);
            result.hy_weights.push(w_hy);
            result.sleeves.push(self.rule.sleeve(signal));
            result.hy_returns.push(p.hy);
            result.ig_returns.push(p.ig);
            result.strategy_returns.push(w_hy * p.hy + w_ig * p.ig);
            result.benchmark_returns.push(p.embi);

            signal = p.regime;
        }

        result.cumulative_strategy = cumulative_product(&result.strategy_returns);
        result.cumulative_benchmark = cumulative_product(&result.benchmark_returns);
        result.drawdown_strategy = drawdown(&result.strategy_returns);
        result.drawdown_benchmark = drawdown(&result.benchmark_returns);

        debug!(
            rule = self.rule.name(),
            periods = n,
            hy_periods = result.sleeves.iter().filter(|s| **s == Sleeve::HighYield).count(),
            "backtest complete"
        );
        Ok(result)
    }
}
