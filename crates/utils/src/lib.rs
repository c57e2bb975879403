#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quadrant/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod schema;
pub use schema::{
    DATE_COLUMN_NAMES, EMBI_ALIASES, HY_ALIASES, IG_ALIASES, ReturnColumns, detect_date_column,
    parse_date, resolve_return_columns,
};

mod frame;
pub use frame::{MAX_ABS_RETURN, factor_matrix_from_frame, monthly_table, returns_table_from_frame};

mod zscore;
pub use zscore::{IngestConfig, expanding_zscores};

mod cache;
pub use cache::{ContentCache, ContentKey, bytes_hash};

mod error;
pub use error::UtilsError;
