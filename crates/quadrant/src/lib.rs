//! # quadrant
//!
//! Macro regime model built on an expanding-window principal component
//! analysis, with an HY/IG regime-switching backtest.
//!
//! This crate provides a unified interface to the quadrant workspace.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components and the pipeline
//! - `primitives`: Core type definitions
//! - `traits`: Trait abstractions
//! - `math`: Eigen-decomposition, PCA and rolling statistics
//! - `model`: Expanding PCA engine and regime classifier
//! - `backtest`: Regime-switching backtest and tracking metrics
//! - `utils`: Ingestion, z-scores and caching
//! - `pipeline`: [`Pipeline`] running the full core
//! - `cli`: The `quadrant` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use quadrant::{Pipeline, PipelineConfig};
//!
//! let output = Pipeline::new().run(&factors, &returns)?;
//! println!("{:?}", output.regimes.latest());
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quadrant/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use quadrant_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use quadrant_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use quadrant_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use quadrant_model as model;
#[cfg(feature = "backtest")]
#[doc(inline)]
pub use quadrant_backtest as backtest;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use quadrant_utils as utils;

#[cfg(feature = "pipeline")]
mod pipeline;
#[cfg(feature = "pipeline")]
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, PipelineSummary};

#[cfg(feature = "pipeline")]
mod error;
#[cfg(feature = "pipeline")]
pub use error::PipelineError;

// Only the binary uses these.
#[cfg(feature = "cli")]
use {clap as _, csv as _, serde_json as _, tracing_subscriber as _};
