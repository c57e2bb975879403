#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quadrant/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod linalg;
pub use linalg::{SymmetricEigen, symmetric_eigen};

mod pca;
pub use pca::{Pca, PcaFit};

mod stats;
pub use stats::{DEGENERATE_STD, correlation, mean, sample_std};

mod rolling;
pub use rolling::{compound, cumulative_product, diff, rolling_compound, rolling_mean, rolling_std};

mod error;
pub use error::MathError;
