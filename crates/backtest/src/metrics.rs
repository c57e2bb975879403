//! Performance and risk metrics over aligned strategy and benchmark returns.

use std::collections::BTreeMap;

use chrono::Datelike;
use quadrant_math::{compound, cumulative_product, mean, rolling_compound, rolling_std, sample_std};
use serde::Serialize;

use crate::BacktestError;

/// Window and annualization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Trailing window, in periods.
    pub window: usize,
    /// Periods per year used to annualize.
    pub periods_per_year: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { window: 12, periods_per_year: 12 }
    }
}

impl MetricsConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `BacktestError::InvalidConfig` if either field is zero.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.window == 0 {
            return Err(BacktestError::InvalidConfig("window must be positive".to_string()));
        }
        if self.periods_per_year == 0 {
            return Err(BacktestError::InvalidConfig(
                "periods_per_year must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_aligned(strategy: &[f64], benchmark: &[f64]) -> Result<(), BacktestError> {
    if strategy.len() != benchmark.len() {
        return Err(BacktestError::LengthMismatch {
            strategy: strategy.len(),
            benchmark: benchmark.len(),
        });
    }
    Ok(())
}

/// Drawdown of the growth-of-1.0 index built from `returns`.
///
/// Always non-positive, and zero wherever the index sets a new high.
#[must_use]
pub fn drawdown(returns: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative_product(returns)
        .into_iter()
        .map(|c| {
            peak = peak.max(c);
            c / peak - 1.0
        })
        .collect()
}

/// Trailing compounded strategy return relative to the benchmark's, minus one.
///
/// # Errors
/// Returns error if the series lengths differ.
pub fn rolling_excess(
    strategy: &[f64],
    benchmark: &[f64],
    window: usize,
) -> Result<Vec<Option<f64>>, BacktestError> {
    check_aligned(strategy, benchmark)?;
    Ok(rolling_compound(strategy, window)
        .into_iter()
        .zip(rolling_compound(benchmark, window))
        .map(|(s, b)| s.zip(b).map(|(s, b)| (1.0 + s) / (1.0 + b) - 1.0))
        .collect())
}

/// Cumulative strategy index over cumulative benchmark index, minus one.
///
/// # Errors
/// Returns error if the series lengths differ.
pub fn cumulative_excess(strategy: &[f64], benchmark: &[f64]) -> Result<Vec<f64>, BacktestError> {
    check_aligned(strategy, benchmark)?;
    Ok(cumulative_product(strategy)
        .into_iter()
        .zip(cumulative_product(benchmark))
        .map(|(s, b)| s / b - 1.0)
        .collect())
}

/// Compounded return of both series within one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarReturn {
    /// Calendar year.
    pub year: i32,
    /// Strategy return for the year.
    pub strategy: f64,
    /// Benchmark return for the year.
    pub benchmark: f64,
}

/// Compound each calendar year's returns, years ascending.
///
/// # Errors
/// Returns error if the three inputs differ in length.
pub fn calendar_returns(
    dates: &[quadrant_primitives::Date],
    strategy: &[f64],
    benchmark: &[f64],
) -> Result<Vec<CalendarReturn>, BacktestError> {
    check_aligned(strategy, benchmark)?;
    if dates.len() != strategy.len() {
        return Err(BacktestError::LengthMismatch {
            strategy: strategy.len(),
            benchmark: dates.len(),
        });
    }

    let mut by_year: BTreeMap<i32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for ((date, s), b) in dates.iter().zip(strategy).zip(benchmark) {
        let entry = by_year.entry(date.year()).or_default();
        entry.0.push(*s);
        entry.1.push(*b);
    }

    Ok(by_year
        .into_iter()
        .map(|(year, (s, b))| CalendarReturn {
            year,
            strategy: compound(&s),
            benchmark: compound(&b),
        })
        .collect())
}

/// Tracking error and information ratio, rolling and over the full sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingSummary {
    /// Annualized trailing standard deviation of active returns.
    pub te_rolling: Vec<Option<f64>>,
    /// Trailing compounded active return over trailing tracking error.
    ///
    /// `None` until the window fills, and where the trailing tracking error is zero.
    pub ir_rolling: Vec<Option<f64>>,
    /// Annualized standard deviation of active returns over the full sample.
    pub te_overall: f64,
    /// Annualized return difference over overall tracking error; `NaN` when that is zero.
    pub ir_overall: f64,
    /// Mean strategy return times periods per year.
    pub ann_strategy: f64,
    /// Mean benchmark return times periods per year.
    pub ann_benchmark: f64,
}

/// Tracking error and information ratio of `strategy` against `benchmark`.
///
/// # Errors
/// Returns error if the configuration is invalid or the lengths differ.
pub fn tracking_summary(
    strategy: &[f64],
    benchmark: &[f64],
    config: &MetricsConfig,
) -> Result<TrackingSummary, BacktestError> {
    config.validate()?;
    check_aligned(strategy, benchmark)?;

    let scale = (config.periods_per_year as f64).sqrt();
    let active: Vec<f64> = strategy.iter().zip(benchmark).map(|(s, b)| s - b).collect();

    let te_rolling: Vec<Option<f64>> =
        rolling_std(&active, config.window).into_iter().map(|s| s.map(|s| s * scale)).collect();
    let ir_rolling = rolling_compound(&active, config.window)
        .into_iter()
        .zip(&te_rolling)
        .map(|(a, te)| match (a, te) {
            (Some(a), Some(te)) if *te != 0.0 => Some(a / te),
            _ => None,
        })
        .collect();

    let te_overall = sample_std(&active).map_or(f64::NAN, |s| s * scale);
    let periods = config.periods_per_year as f64;
    let ann_strategy = mean(strategy).map_or(f64::NAN, |m| m * periods);
    let ann_benchmark = mean(benchmark).map_or(f64::NAN, |m| m * periods);
    let ir_overall = if te_overall == 0.0 {
        f64::NAN
    } else {
        (ann_strategy - ann_benchmark) / te_overall
    };

    Ok(TrackingSummary {
        te_rolling,
        ir_rolling,
        te_overall,
        ir_overall,
        ann_strategy,
        ann_benchmark,
    })
}
