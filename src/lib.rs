//! `interval-colops` computes per-group column statistics for genomic interval tools.
//!
//! A host tool (merge, map, groupby, ...) groups records of a database file by some association
//! rule, e.g. all records overlapping a query interval. For each group, this crate reduces the
//! requested columns with the requested operations and renders a tab-delimited fragment that the
//! host appends to its own output line.
//!
//! ## Request format
//!
//! A request is two comma-delimited lists, as given to the `-c` and `-o` flags:
//!
//! - `-c 5 -o sum,count`: one column, every operation applied to it
//! - `-c 4,5,6 -o distinct`: one operation, applied to every column
//! - `-c 5,4 -o mean,collapse`: paired in order; the lists must then have equal length
//!
//! Requests are validated once against a [`types::RecordSchema`] before any group is evaluated:
//! columns must exist for the record kind, numeric operations need numeric columns, and alignment
//! (BAM) records are rejected outright. See [`error::ValidationError`] for every failure mode.
//!
//! ## Operations
//!
//! | name | result |
//! |---|---|
//! | `sum`, `mean`, `min`, `max`, `absmin`, `absmax` | numeric reduction |
//! | `stddev`, `sample_stddev` | population / sample standard deviation |
//! | `median` | median (mean of the middle two on even counts) |
//! | `mode`, `antimode` | most / least frequent value |
//! | `count`, `count_distinct` | number of records / unique values |
//! | `distinct`, `distinct_only` | unique values / values seen exactly once |
//! | `collapse`, `concat` | all values, duplicates kept |
//! | `freq_asc`, `freq_desc` | `value:count` pairs by frequency |
//! | `first`, `last` | first / last value |
//!
//! Numeric statistics that are undefined for a group (e.g. `mean` of no values, `sample_stddev` of
//! one value) are rendered as the configured null value (`.` by default).
//!
//! ## Example
//!
//! ```rust
//! use interval_colops::processing::{ColumnOps, ColumnOpsOptions};
//! use interval_colops::types::RecordLayout;
//!
//! let options = ColumnOpsOptions {
//!     columns: "5".to_string(),
//!     operations: "sum,count,collapse".to_string(),
//!     ..Default::default()
//! };
//! let ops = ColumnOps::from_options(&options, &RecordLayout::Bed6).unwrap();
//!
//! let hits = vec![
//!     vec!["chr1", "100", "200", "a", "10", "+"],
//!     vec!["chr1", "150", "250", "b", "20", "-"],
//! ];
//! assert_eq!(ops.evaluate(&hits), "30\t2\t10,20");
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: operation catalog, request validation, reducers, and evaluation
//! - [`execution`]: parallel evaluation of many groups with metrics and observer hooks
//! - [`ingestion`]: loading tab-delimited record files and inferring their layout
//! - [`types`]: record kinds, layouts, and record access
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{LoadError, LoadResult, ValidationError, ValidationResult};
