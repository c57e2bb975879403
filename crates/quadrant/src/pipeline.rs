//! End-to-end run of the regime model.

use std::sync::Arc;

use polars::prelude::DataFrame;
use quadrant_backtest::{
    Backtest, BacktestResult, BasicLabelRow, CalendarReturn, MetricsConfig, RegimeAverage,
    RiskAverage, StrategyLabelRow, TrackingSummary, averages_by_regime, averages_by_risk,
    basic_labels, calendar_returns, cumulative_excess, rolling_excess, strategy_labels,
    tracking_summary,
};
use quadrant_model::{
    ContributionConfig, CurrentContributors, ExpandingPca, ExpandingPcaConfig,
    PrincipalComponentSeries, QuadrantClassifier, VariableContribution, classify_series,
    current_contributors, loading_timeline,
};
use quadrant_primitives::{
    Date, FactorMatrix, LoadingTimeline, LoadingVector, Regime, RegimeSegment, RegimeSeries,
    ReturnsTable,
};
use quadrant_utils::{
    ContentCache, ContentKey, IngestConfig, expanding_zscores, factor_matrix_from_frame,
    monthly_table,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::PipelineError;

/// Settings for every stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Expanding PCA anchors and smoothing window.
    pub pca: ExpandingPcaConfig,
    /// Tracking window and annualization.
    pub metrics: MetricsConfig,
    /// Current-contributor lookback.
    pub contributions: ContributionConfig,
    /// Z-score window for raw factor uploads.
    pub ingest: IngestConfig,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Factor matrix the components were fitted on.
    pub factors: FactorMatrix,
    /// Returns the backtest ran over.
    pub returns: ReturnsTable,
    /// PC scores, explained variance and smoothed scores per date.
    pub series: PrincipalComponentSeries,
    /// Oriented loadings at the final cutoff.
    pub loadings: Option<LoadingVector>,
    /// Per-date loadings, each fitted through its date.
    pub timeline: LoadingTimeline,
    /// Regime per date.
    pub regimes: RegimeSeries,
    /// Contiguous regime runs.
    pub segments: Vec<RegimeSegment>,
    /// Switching strategy against the benchmark.
    pub backtest: BacktestResult,
    /// Tracking error and information ratio.
    pub tracking: TrackingSummary,
    /// Trailing-window excess return.
    pub rolling_excess: Vec<Option<f64>>,
    /// Cumulative excess return.
    pub cumulative_excess: Vec<f64>,
    /// Compounded returns per calendar year.
    pub calendar: Vec<CalendarReturn>,
    /// Variables driving the latest regime.
    pub contributors: Option<CurrentContributors>,
}

impl PipelineOutput {
    /// Date, regime and risk state over the common dates.
    #[must_use]
    pub fn basic_labels(&self) -> Vec<BasicLabelRow> {
        basic_labels(&self.returns, &self.regimes)
    }

    /// Per-period strategy rows.
    #[must_use]
    pub fn strategy_labels(&self) -> Vec<StrategyLabelRow> {
        strategy_labels(&self.backtest)
    }

    /// Mean HY and IG return per regime.
    #[must_use]
    pub fn averages_by_regime(&self) -> Vec<RegimeAverage> {
        averages_by_regime(&self.returns, &self.regimes)
    }

    /// Mean HY and IG return per risk state.
    #[must_use]
    pub fn averages_by_risk(&self) -> Vec<RiskAverage> {
        averages_by_risk(&self.returns, &self.regimes)
    }

    /// Headline figures for reporting.
    #[must_use]
    pub fn summary(&self, top_n: usize) -> PipelineSummary {
        let latest = self.regimes.latest();
        let last = self.series.len().checked_sub(1);
        let evr = |v: &[Option<f64>]| last.and_then(|i| v[i]);
        let named = |items: Vec<&VariableContribution>, value: fn(&VariableContribution) -> f64| {
            items.into_iter().map(|v| (v.variable.clone(), value(v))).collect::<Vec<_>>()
        };
        let (top_pc1, top_pc2) = self.contributors.as_ref().map_or_else(Default::default, |c| {
            (named(c.top_pc1(top_n), |v| v.pc1), named(c.top_pc2(top_n), |v| v.pc2))
        });

        PipelineSummary {
            first_date: self.backtest.dates.first().copied(),
            last_date: self.backtest.dates.last().copied(),
            periods: self.backtest.len(),
            as_of: latest.map(|(d, _)| d),
            regime: latest.map(|(_, r)| r),
            risk_on: latest.map(|(_, r)| r.is_risk_on()),
            pc1_evr: evr(&self.series.pc1_evr),
            pc2_evr: evr(&self.series.pc2_evr),
            regime_runs: self.segments.len(),
            total_strategy_return: self.backtest.total_strategy_return(),
            total_benchmark_return: self.backtest.total_benchmark_return(),
            max_drawdown_strategy: self.backtest.max_drawdown_strategy(),
            max_drawdown_benchmark: self.backtest.max_drawdown_benchmark(),
            annualized_strategy: self.tracking.ann_strategy,
            annualized_benchmark: self.tracking.ann_benchmark,
            tracking_error: self.tracking.te_overall,
            information_ratio: self.tracking.ir_overall,
            top_pc1,
            top_pc2,
        }
    }
}

/// Headline figures of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    /// First backtest date.
    pub first_date: Option<Date>,
    /// Last backtest date.
    pub last_date: Option<Date>,
    /// Backtest periods.
    pub periods: usize,
    /// Latest date with a defined regime.
    pub as_of: Option<Date>,
    /// Regime at `as_of`.
    pub regime: Option<Regime>,
    /// Risk state at `as_of`.
    pub risk_on: Option<bool>,
    /// PC1 explained-variance ratio at the last date.
    pub pc1_evr: Option<f64>,
    /// PC2 explained-variance ratio at the last date.
    pub pc2_evr: Option<f64>,
    /// Number of contiguous regime runs.
    pub regime_runs: usize,
    /// Compounded strategy return.
    pub total_strategy_return: f64,
    /// Compounded benchmark return.
    pub total_benchmark_return: f64,
    /// Worst strategy drawdown.
    pub max_drawdown_strategy: f64,
    /// Worst benchmark drawdown.
    pub max_drawdown_benchmark: f64,
    /// Annualized mean strategy return.
    pub annualized_strategy: f64,
    /// Annualized mean benchmark return.
    pub annualized_benchmark: f64,
    /// Annualized tracking error over the whole sample.
    pub tracking_error: f64,
    /// Information ratio over the whole sample.
    pub information_ratio: f64,
    /// Largest PC1 contributions at `as_of`.
    pub top_pc1: Vec<(String, f64)>,
    /// Largest PC2 contributions at `as_of`.
    pub top_pc2: Vec<(String, f64)>,
}

/// Runs ingestion, the expanding PCA, classification, backtest and metrics.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration.
    #[must_use]
    pub const fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Factor matrix from an uploaded table.
    ///
    /// With `raw`, values are standardized by expanding z-scores; otherwise the
    /// table is taken as already standardized and a leading all-zero row is dropped.
    ///
    /// # Errors
    /// Returns error if the table cannot be normalised or scored.
    pub fn factors_from_frame(
        &self,
        df: &DataFrame,
        raw: bool,
    ) -> Result<FactorMatrix, PipelineError> {
        let matrix = if raw {
            expanding_zscores(&monthly_table(df)?, &self.config.ingest)?
        } else {
            factor_matrix_from_frame(df, true)?
        };
        Ok(matrix)
    }

    /// Run every stage over a standardized factor matrix and a returns table.
    ///
    /// # Errors
    /// Returns error if any configuration is invalid, the factor matrix has
    /// fewer than two variables or a missing value, or the returns and
    /// regimes share no date.
    pub fn run(
        &self,
        factors: &FactorMatrix,
        returns: &ReturnsTable,
    ) -> Result<PipelineOutput, PipelineError> {
        let config = &self.config;
        config.metrics.validate()?;

        let fitted = ExpandingPca::with_config(config.pca.clone()).fit(factors)?;
        let timeline = loading_timeline(factors, &config.pca)?;
        let regimes = classify_series(&fitted.series, &QuadrantClassifier::new())?;
        let segments = regimes.segments();
        debug!(segments = segments.len(), timeline = timeline.len(), "model stage complete");

        let backtest = Backtest::new().run(returns, &regimes)?;
        let (strategy, benchmark) = (&backtest.strategy_returns, &backtest.benchmark_returns);
        let tracking = tracking_summary(strategy, benchmark, &config.metrics)?;
        let rolling_excess = rolling_excess(strategy, benchmark, config.metrics.window)?;
        let cumulative_excess = cumulative_excess(strategy, benchmark)?;
        let calendar = calendar_returns(&backtest.dates, strategy, benchmark)?;

        let contributors = current_contributors(
            factors,
            &fitted.series,
            &regimes,
            &timeline,
            &config.contributions,
        )?;

        info!(
            dates = factors.n_rows(),
            variables = factors.n_variables(),
            periods = backtest.len(),
            regime = ?regimes.latest().map(|(_, r)| r),
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            factors: factors.clone(),
            returns: returns.clone(),
            series: fitted.series,
            loadings: fitted.loadings,
            timeline,
            regimes,
            segments,
            backtest,
            tracking,
            rolling_excess,
            cumulative_excess,
            calendar,
            contributors,
        })
    }

    /// Run through `cache`, keyed by the raw upload bytes and the z-score window.
    ///
    /// `load` parses the uploads and is only called on a cache miss.
    ///
    /// # Errors
    /// Returns error if `load` or the run fails; failures are not cached.
    pub fn run_cached<F>(
        &self,
        cache: &ContentCache<PipelineOutput>,
        uploads: &[&[u8]],
        load: F,
    ) -> Result<(ContentKey, Arc<PipelineOutput>), PipelineError>
    where
        F: FnOnce(&Self) -> Result<(FactorMatrix, ReturnsTable), PipelineError>,
    {
        let key = ContentKey::new(uploads, self.config.ingest.min_periods_for_zscore);
        let output = cache.get_or_try_insert_with(key.clone(), || {
            let (factors, returns) = load(self)?;
            self.run(&factors, &returns)
        })?;
        Ok((key, output))
    }
}
