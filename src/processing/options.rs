//! Configuration surface for column operations.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadResult, ValidationResult};
use crate::types::{FieldAccess, RecordSchema};

use super::evaluate::evaluate;
use super::spec::ColumnOpSpec;

/// Default column list: the BED score column.
pub const DEFAULT_COLUMNS: &str = "5";
/// Default operation list.
pub const DEFAULT_OPERATIONS: &str = "sum";
/// Default delimiter for list-valued results.
pub const DEFAULT_DELIMITER: &str = ",";
/// Default placeholder for undefined numeric results.
pub const DEFAULT_NULL_VALUE: &str = ".";

/// Rendering settings used by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Joins the values of collapse/concat/distinct/freq results.
    pub delimiter: String,
    /// Substituted for numeric statistics that are undefined for a group.
    pub null_value: String,
    /// Decimal places for numeric results. `None` prints the shortest exact representation.
    pub precision: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            null_value: DEFAULT_NULL_VALUE.to_string(),
            precision: None,
        }
    }
}

/// User-facing options, mirroring the `-c`, `-o`, `-delim`, `-null` and `-prec` flags of the host
/// tools.
///
/// Use [`Default`] for the tool defaults (`-c 5 -o sum`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOpsOptions {
    /// Comma-delimited 1-based columns.
    pub columns: String,
    /// Comma-delimited operation names.
    pub operations: String,
    /// Delimiter for list-valued results.
    pub delimiter: String,
    /// Placeholder for undefined numeric results.
    pub null_value: String,
    /// Decimal places for numeric results.
    pub precision: Option<usize>,
}

impl Default for ColumnOpsOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.to_string(),
            operations: DEFAULT_OPERATIONS.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            null_value: DEFAULT_NULL_VALUE.to_string(),
            precision: None,
        }
    }
}

impl ColumnOpsOptions {
    /// Parse options from a JSON object. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rendering part of the options.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            delimiter: self.delimiter.clone(),
            null_value: self.null_value.clone(),
            precision: self.precision,
        }
    }
}

/// A validated spec bundled with its rendering settings.
///
/// Build once at setup, then call [`ColumnOps::evaluate`] for every group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOps {
    spec: ColumnOpSpec,
    config: EngineConfig,
}

impl ColumnOps {
    /// Validate `options` against `schema`.
    pub fn from_options<S>(options: &ColumnOpsOptions, schema: &S) -> ValidationResult<Self>
    where
        S: RecordSchema + ?Sized,
    {
        let spec = ColumnOpSpec::validate(&options.columns, &options.operations, schema)?;
        Ok(Self {
            spec,
            config: options.engine_config(),
        })
    }

    /// Bundle an already validated spec with a config.
    pub fn new(spec: ColumnOpSpec, config: EngineConfig) -> Self {
        Self { spec, config }
    }

    pub fn spec(&self) -> &ColumnOpSpec {
        &self.spec
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one group.
    pub fn evaluate<R: FieldAccess>(&self, group: &[R]) -> String {
        evaluate(&self.spec, group, &self.config)
    }
}
