//! File helpers used between external tool runs.
//!
//! Data files are headerless comma-separated rows of state indices, one row per
//! sample. Nothing here interprets the values beyond splitting on commas.

pub mod columns;
pub mod metrics;
pub mod schema;
pub mod split;

pub use columns::{append_columns, count_columns, drop_columns};
pub use metrics::{log_probability_lines, mean_squared_error, read_log_probabilities};
pub use pgmrun_utils::error::DataError;
pub use schema::{
    arff_header, copy_with_header, read_header_names, read_schema, write_header, write_schema,
};
pub use split::{DEFAULT_TEST_SIZE, SplitOutcome, split_csv};
