//! Column operations over hit groups.
//!
//! The processing layer turns a `columns` / `operations` request into a validated
//! [`ColumnOpSpec`], then reduces each group of records to a tab-delimited fragment.
//!
//! - [`operation`]: the operation catalog ([`Operation::lookup`], [`Operation::is_numeric`])
//! - [`spec`]: request parsing, broadcast pairing, and validation against a
//!   [`crate::types::RecordSchema`]
//! - [`reduce()`]: the reducers for a single (column, operation) pair
//! - [`evaluate()`]: per-group evaluation and output assembly
//! - [`options`]: [`EngineConfig`], [`ColumnOpsOptions`], and the [`ColumnOps`] bundle
//!
//! ## Example: validate once, evaluate per group
//!
//! ```rust
//! use interval_colops::processing::{ColumnOps, ColumnOpsOptions};
//! use interval_colops::types::RecordLayout;
//!
//! let options = ColumnOpsOptions {
//!     columns: "4,5".to_string(),
//!     operations: "distinct,mean".to_string(),
//!     ..Default::default()
//! };
//! let ops = ColumnOps::from_options(&options, &RecordLayout::Bed6).unwrap();
//!
//! let group = vec![
//!     vec!["chr1", "10", "20", "geneA", "4", "+"],
//!     vec!["chr1", "12", "40", "geneB", "8", "+"],
//!     vec!["chr1", "15", "22", "geneA", "6", "-"],
//! ];
//! assert_eq!(ops.evaluate(&group), "geneA,geneB\t6");
//!
//! // Empty groups still produce one field per pair.
//! let none: Vec<Vec<&str>> = Vec::new();
//! assert_eq!(ops.evaluate(&none), "\t.");
//! ```

pub mod evaluate;
pub mod operation;
pub mod options;
pub mod reduce;
pub mod spec;

pub use evaluate::evaluate;
pub use operation::Operation;
pub use options::{ColumnOps, ColumnOpsOptions, EngineConfig};
pub use reduce::{reduce, Reduced};
pub use spec::{ColumnOp, ColumnOpSpec};
