#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quadrant/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{
    ContributionConfig, DEFAULT_EQUITY_ANCHORS, DEFAULT_YIELD_ANCHORS, ExpandingPcaConfig,
};

mod orientation;
pub use orientation::{Anchors, Orientation};

mod expanding;
pub use expanding::{CutoffFit, ExpandingPca, ExpandingPcaOutput, PrincipalComponentSeries};

mod timeline;
pub use timeline::loading_timeline;

mod regime;
pub use regime::{QuadrantClassifier, classify_series, regimes_to_dataframe};

mod contributions;
pub use contributions::{CurrentContributors, VariableContribution, current_contributors};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use quadrant_traits::RegimeClassifier;

    pub use super::{
        ExpandingPca, ExpandingPcaConfig, ModelError, PrincipalComponentSeries,
        QuadrantClassifier, classify_series,
    };
}
