#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quadrant/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod strategy;
pub use strategy::{Backtest, BacktestResult, RiskOnSwitch};

mod metrics;
pub use metrics::{
    CalendarReturn, MetricsConfig, TrackingSummary, calendar_returns, cumulative_excess,
    drawdown, rolling_excess, tracking_summary,
};

mod labels;
pub use labels::{
    BasicLabelRow, RegimeAverage, RiskAverage, StrategyLabelRow, averages_by_regime,
    averages_by_risk, basic_labels, strategy_labels,
};

mod error;
pub use error::BacktestError;
