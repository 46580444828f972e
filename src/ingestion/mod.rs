//! Record loading.
//!
//! Most callers should use [`load_records`] (from [`unified`]) which:
//!
//! - infers the record format from the file extension (or you can force one via [`LoadOptions`])
//! - reads tab-delimited records into memory
//! - infers the [`crate::types::RecordLayout`] used to validate column operations
//! - optionally reports the outcome to a [`LoadObserver`]
//!
//! The raw reader is available under [`text`].

pub mod observability;
pub mod text;
pub mod unified;

pub use observability::{
    FileObserver, LoadContext, LoadFailure, LoadObserver, LoadSeverity, LoadStats, StdErrObserver,
};
pub use unified::{load_records, LoadOptions, LoadedRecords, RecordFormat};
