//! Path-based record loading with format inference and observer reporting.
//!
//! Most callers should use [`load_records`], which reads a file into [`LoadedRecords`] and infers
//! the [`RecordLayout`] that column operations are validated against.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::types::{Record, RecordLayout, SAM_FIXED_FIELDS, VCF_FIXED_FIELDS};

use super::observability::{LoadContext, LoadFailure, LoadObserver, LoadSeverity, LoadStats};
use super::text;

/// Supported text record formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// BED3 through BED12, or BED plus extra columns.
    Bed,
    /// bedGraph: chrom, start, end, value.
    BedGraph,
    /// VCF variant calls.
    Vcf,
    /// GFF / GTF feature annotations.
    Gff,
    /// SAM alignments. Binary BAM is not read.
    Sam,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bed => "BED",
            Self::BedGraph => "bedGraph",
            Self::Vcf => "VCF",
            Self::Gff => "GFF",
            Self::Sam => "SAM",
        })
    }
}

impl RecordFormat {
    /// Parse a record format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "bed" => Some(Self::Bed),
            "bedgraph" | "bg" => Some(Self::BedGraph),
            "vcf" => Some(Self::Vcf),
            "gff" | "gff3" | "gtf" => Some(Self::Gff),
            "sam" => Some(Self::Sam),
            _ => None,
        }
    }

    /// Minimum number of fields a record must have.
    pub fn min_width(self) -> usize {
        match self {
            Self::Bed => 3,
            Self::BedGraph => 4,
            Self::Vcf => VCF_FIXED_FIELDS,
            Self::Gff => 8,
            Self::Sam => SAM_FIXED_FIELDS,
        }
    }

    /// Infer the layout of `records` read in this format.
    ///
    /// BED layouts follow the width of the first record; VCF layouts cover the widest record.
    pub fn layout_for(self, records: &[Record]) -> RecordLayout {
        match self {
            Self::Bed => RecordLayout::bed_for_width(records.first().map_or(3, Record::width)),
            Self::BedGraph => RecordLayout::BedGraph,
            Self::Vcf => RecordLayout::VariantCall {
                total: records
                    .iter()
                    .map(Record::width)
                    .max()
                    .unwrap_or(VCF_FIXED_FIELDS),
            },
            Self::Gff => RecordLayout::FeatureAnnotation,
            Self::Sam => RecordLayout::Alignment,
        }
    }
}

/// Records read from one file, with the layout they were inferred to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecords {
    pub format: RecordFormat,
    pub layout: RecordLayout,
    pub records: Vec<Record>,
}

impl LoadedRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Options controlling [`load_records`].
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<RecordFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Failures at or above this severity are reported with `alert` set.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a record file and infer its layout.
///
/// When an observer is configured it receives exactly one callback: `on_loaded` with the record
/// count and inferred layout, or `on_failed` with the severity of the error and whether it reached
/// `options.alert_at_or_above`.
///
/// ```no_run
/// use interval_colops::ingestion::{load_records, LoadOptions};
/// use interval_colops::processing::{ColumnOps, ColumnOpsOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let db = load_records("genes.bed", &LoadOptions::default())?;
/// let ops = ColumnOps::from_options(&ColumnOpsOptions::default(), &db.layout)?;
/// println!("{}", ops.evaluate(&db.records));
/// # Ok(())
/// # }
/// ```
pub fn load_records(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<LoadedRecords> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format,
    };

    let result = text::read_records_from_path(path, format.min_width()).map(|records| LoadedRecords {
        format,
        layout: format.layout_for(&records),
        records,
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(loaded) => obs.on_loaded(
                &ctx,
                LoadStats {
                    records: loaded.len(),
                    layout: loaded.layout,
                },
            ),
            Err(error) => {
                let severity = severity_for_error(error);
                obs.on_failed(
                    &ctx,
                    &LoadFailure {
                        severity,
                        alert: severity >= options.alert_at_or_above,
                        error,
                    },
                );
            }
        }
    }

    result
}

fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::Io(_) => LoadSeverity::Critical,
        LoadError::Csv(err) => {
            if error_chain_contains_io(err) {
                LoadSeverity::Critical
            } else {
                LoadSeverity::Error
            }
        }
        LoadError::Config(_) | LoadError::UnknownFormat { .. } | LoadError::Malformed { .. } => {
            LoadSeverity::Error
        }
    }
}

fn error_chain_contains_io(e: &csv::Error) -> bool {
    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
        return true;
    }
    let mut cur: Option<&(dyn StdError + 'static)> = e.source();
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn infer_format_from_path(path: &Path) -> LoadResult<RecordFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LoadError::UnknownFormat {
            message: format!("path has no extension ({})", path.display()),
        })?;

    if ext.eq_ignore_ascii_case("bam") {
        return Err(LoadError::UnknownFormat {
            message: format!("binary BAM input is not supported ({})", path.display()),
        });
    }

    RecordFormat::from_extension(ext).ok_or_else(|| LoadError::UnknownFormat {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::{infer_format_from_path, RecordFormat};
    use crate::error::LoadError;
    use crate::types::{Record, RecordLayout};
    use std::path::Path;

    fn rec(width: usize) -> Record {
        (0..width).map(|i| i.to_string()).collect()
    }

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(RecordFormat::from_extension("BED"), Some(RecordFormat::Bed));
        assert_eq!(RecordFormat::from_extension("bg"), Some(RecordFormat::BedGraph));
        assert_eq!(RecordFormat::from_extension("gtf"), Some(RecordFormat::Gff));
        assert_eq!(RecordFormat::from_extension("vcf"), Some(RecordFormat::Vcf));
        assert_eq!(RecordFormat::from_extension("txt"), None);
    }

    #[test]
    fn bam_paths_are_rejected() {
        let err = infer_format_from_path(Path::new("reads.bam")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat { .. }));
        assert!(err.to_string().contains("BAM"));
    }

    #[test]
    fn layouts_follow_record_width() {
        assert_eq!(RecordFormat::Bed.layout_for(&[rec(5), rec(5)]), RecordLayout::Bed5);
        assert_eq!(RecordFormat::Bed.layout_for(&[]), RecordLayout::Bed3);
        assert_eq!(
            RecordFormat::Vcf.layout_for(&[rec(8), rec(10)]),
            RecordLayout::VariantCall { total: 10 }
        );
        assert_eq!(RecordFormat::Sam.layout_for(&[rec(11)]), RecordLayout::Alignment);
    }
}
