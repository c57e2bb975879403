#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quadrant/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod calendar;
pub use calendar::{month_end, month_start, next_month_start};

mod matrix;
pub use matrix::FactorMatrix;

mod returns;
pub use returns::ReturnsTable;

mod regime;
pub use regime::{Regime, RegimeSegment, RegimeSeries, Sleeve};

mod loadings;
pub use loadings::{LoadingTimeline, LoadingVector};

mod error;
pub use error::DataError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
