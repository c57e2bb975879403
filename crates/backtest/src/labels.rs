//! Export rows: regime labels, strategy labels and average sleeve returns.

use quadrant_primitives::{Date, Regime, RegimeSeries, ReturnsTable, Sleeve};
use serde::Serialize;

use crate::{BacktestResult, strategy::align};

/// Regime label and risk state for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasicLabelRow {
    /// Date.
    #[serde(rename = "Date")]
    pub date: Date,
    /// Regime, empty when undefined.
    #[serde(rename = "Regime")]
    pub regime: Option<Regime>,
    /// Whether the regime is risk-on; false when undefined.
    #[serde(rename = "Risk_On")]
    pub risk_on: bool,
}

/// Label, sleeve choice and returns for one date of the lagged strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyLabelRow {
    /// Date.
    #[serde(rename = "Date")]
    pub date: Date,
    /// Regime at this date.
    #[serde(rename = "Regime")]
    pub regime: Option<Regime>,
    /// Risk state at this date.
    #[serde(rename = "Risk_On")]
    pub risk_on: bool,
    /// Sleeve held, chosen from the previous date's regime.
    #[serde(rename = "Sleeve")]
    pub sleeve: Sleeve,
    /// HY return.
    #[serde(rename = "HY_Return")]
    pub hy_return: f64,
    /// IG return.
    #[serde(rename = "IG_Return")]
    pub ig_return: f64,
    /// EMBI return.
    #[serde(rename = "EMBI_Return")]
    pub embi_return: f64,
    /// Strategy return.
    #[serde(rename = "Strategy_Return")]
    pub strategy_return: f64,
}

/// Mean sleeve returns over the dates in one regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegimeAverage {
    /// Regime.
    #[serde(rename = "Regime")]
    pub regime: Regime,
    /// Mean HY return.
    #[serde(rename = "HY")]
    pub hy: f64,
    /// Mean IG return.
    #[serde(rename = "IG")]
    pub ig: f64,
    /// Number of dates.
    #[serde(rename = "Periods")]
    pub periods: usize,
}

/// Mean sleeve returns over the dates in one risk state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAverage {
    /// Risk state; undefined regimes count as risk-off.
    #[serde(rename = "Risk_On")]
    pub risk_on: bool,
    /// Mean HY return.
    #[serde(rename = "HY")]
    pub hy: f64,
    /// Mean IG return.
    #[serde(rename = "IG")]
    pub ig: f64,
    /// Number of dates.
    #[serde(rename = "Periods")]
    pub periods: usize,
}

fn risk_on(regime: Option<Regime>) -> bool {
    regime.is_some_and(Regime::is_risk_on)
}

/// Regime and risk state for every date shared by `returns` and `regimes`.
#[must_use]
pub fn basic_labels(returns: &ReturnsTable, regimes: &RegimeSeries) -> Vec<BasicLabelRow> {
    align(returns, regimes)
        .into_iter()
        .map(|p| BasicLabelRow { date: p.date, regime: p.regime, risk_on: risk_on(p.regime) })
        .collect()
}

/// No-look-ahead strategy rows taken from a finished backtest.
#[must_use]
pub fn strategy_labels(result: &BacktestResult) -> Vec<StrategyLabelRow> {
    (0..result.len())
        .map(|i| StrategyLabelRow {
            date: result.dates[i],
            regime: result.regimes[i],
            risk_on: risk_on(result.regimes[i]),
            sleeve: result.sleeves[i],
            hy_return: result.hy_returns[i],
            ig_return: result.ig_returns[i],
            embi_return: result.benchmark_returns[i],
            strategy_return: result.strategy_returns[i],
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    hy: f64,
    ig: f64,
    n: usize,
}

impl Accumulator {
    const fn push(&mut self, hy: f64, ig: f64) {
        self.hy += hy;
        self.ig += ig;
        self.n += 1;
    }

    fn means(self) -> (f64, f64) {
        let n = self.n as f64;
        (self.hy / n, self.ig / n)
    }
}

/// Mean HY and IG return per defined regime, in table order; absent regimes are omitted.
#[must_use]
pub fn averages_by_regime(returns: &ReturnsTable, regimes: &RegimeSeries) -> Vec<RegimeAverage> {
    let mut acc = [Accumulator::default(); 4];
    for p in align(returns, regimes) {
        if let Some(regime) = p.regime {
            acc[regime as usize].push(p.hy, p.ig);
        }
    }

    Regime::ALL
        .into_iter()
        .zip(acc)
        .filter(|(_, a)| a.n > 0)
        .map(|(regime, a)| {
            let (hy, ig) = a.means();
            RegimeAverage { regime, hy, ig, periods: a.n }
        })
        .collect()
}

/// Mean HY and IG return for risk-off then risk-on dates; empty states are omitted.
#[must_use]
pub fn averages_by_risk(returns: &ReturnsTable, regimes: &RegimeSeries) -> Vec<RiskAverage> {
    let mut acc = [Accumulator::default(); 2];
    for p in align(returns, regimes) {
        acc[usize::from(risk_on(p.regime))].push(p.hy, p.ig);
    }

    [false, true]
        .into_iter()
        .zip(acc)
        .filter(|(_, a)| a.n > 0)
        .map(|(risk_on, a)| {
            let (hy, ig) = a.means();
            RiskAverage { risk_on, hy, ig, periods: a.n }
        })
        .collect()
}
