//! Record model types shared by validation, evaluation, and loading.
//!
//! A [`RecordSchema`] describes which 1-based columns exist for a record kind and which of them
//! hold numbers. [`RecordLayout`] is the closed set of built-in layouts; callers with their own
//! layouts can implement the trait directly.

use std::fmt;

/// Discriminator for the genomic record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// chrom, start, end.
    Bed3,
    /// BED3 + name.
    Bed4,
    /// BED4 + score.
    Bed5,
    /// BED5 + strand.
    Bed6,
    /// Full BED with thick region and blocks.
    Bed12,
    /// A standard BED prefix followed by arbitrary extra columns.
    BedPlus,
    /// chrom, start, end, value.
    BedGraph,
    /// BAM/SAM alignments.
    Alignment,
    /// VCF variant calls.
    VariantCall,
    /// GFF/GTF feature annotations.
    FeatureAnnotation,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bed3 => "BED3",
            Self::Bed4 => "BED4",
            Self::Bed5 => "BED5",
            Self::Bed6 => "BED6",
            Self::Bed12 => "BED12",
            Self::BedPlus => "BED+",
            Self::BedGraph => "bedGraph",
            Self::Alignment => "BAM",
            Self::VariantCall => "VCF",
            Self::FeatureAnnotation => "GFF",
        };
        f.write_str(s)
    }
}

/// Column capability of a record kind.
///
/// Columns are 1-based, as users name them on the command line.
pub trait RecordSchema {
    /// Which record kind this schema describes.
    fn kind(&self) -> RecordKind;

    /// Number of fields a record of this kind has.
    fn field_count(&self) -> usize;

    /// Whether `column` is guaranteed to hold a parseable number.
    fn is_numeric_field(&self, column: usize) -> bool;
}

/// Number of fixed VCF columns (CHROM through INFO).
pub const VCF_FIXED_FIELDS: usize = 8;

/// Number of fields in a SAM alignment line without optional tags.
pub const SAM_FIXED_FIELDS: usize = 11;

/// Number of fields in a GFF/GTF line.
pub const GFF_FIELDS: usize = 9;

/// Built-in record layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    Bed3,
    Bed4,
    Bed5,
    Bed6,
    Bed12,
    /// `standard` leading BED columns (3..=6) followed by extra columns, `total` fields in all.
    BedPlus { standard: usize, total: usize },
    BedGraph,
    Alignment,
    /// VCF with `total` fields (8 fixed columns, optionally FORMAT and samples).
    VariantCall { total: usize },
    FeatureAnnotation,
}

impl RecordLayout {
    /// Pick the BED layout matching a line of `width` fields.
    ///
    /// Widths that are not one of the standard BED sizes become [`RecordLayout::BedPlus`] over the
    /// widest standard prefix that fits: BED6 for 7 to 11 fields, BED12 beyond that.
    pub fn bed_for_width(width: usize) -> Self {
        match width {
            0..=3 => Self::Bed3,
            4 => Self::Bed4,
            5 => Self::Bed5,
            6 => Self::Bed6,
            12 => Self::Bed12,
            total @ 7..=11 => Self::BedPlus { standard: 6, total },
            total => Self::BedPlus { standard: 12, total },
        }
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BedPlus { standard, total } => {
                write!(f, "BED{standard}+{}", total.saturating_sub(*standard))
            }
            Self::VariantCall { total } => write!(f, "VCF/{total}"),
            // Loaded from text, so the name of the text format.
            Self::Alignment => f.write_str("SAM"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

fn bed_numeric(column: usize) -> bool {
    matches!(column, 2 | 3)
}

fn bed5_numeric(column: usize) -> bool {
    bed_numeric(column) || column == 5
}

// thickStart, thickEnd, blockCount
fn bed12_numeric(column: usize) -> bool {
    bed5_numeric(column) || matches!(column, 7 | 8 | 10)
}

impl RecordSchema for RecordLayout {
    fn kind(&self) -> RecordKind {
        match self {
            Self::Bed3 => RecordKind::Bed3,
            Self::Bed4 => RecordKind::Bed4,
            Self::Bed5 => RecordKind::Bed5,
            Self::Bed6 => RecordKind::Bed6,
            Self::Bed12 => RecordKind::Bed12,
            Self::BedPlus { .. } => RecordKind::BedPlus,
            Self::BedGraph => RecordKind::BedGraph,
            Self::Alignment => RecordKind::Alignment,
            Self::VariantCall { .. } => RecordKind::VariantCall,
            Self::FeatureAnnotation => RecordKind::FeatureAnnotation,
        }
    }

    fn field_count(&self) -> usize {
        match self {
            Self::Bed3 => 3,
            Self::Bed4 | Self::BedGraph => 4,
            Self::Bed5 => 5,
            Self::Bed6 => 6,
            Self::Bed12 => 12,
            Self::BedPlus { total, .. } => *total,
            Self::Alignment => SAM_FIXED_FIELDS,
            Self::VariantCall { total } => (*total).max(VCF_FIXED_FIELDS),
            Self::FeatureAnnotation => GFF_FIELDS,
        }
    }

    fn is_numeric_field(&self, column: usize) -> bool {
        if column == 0 || column > self.field_count() {
            return false;
        }
        match self {
            Self::Bed3 | Self::Bed4 => bed_numeric(column),
            Self::Bed5 | Self::Bed6 => bed5_numeric(column),
            Self::Bed12 => bed12_numeric(column),
            // Extra columns carry no declared type, so numeric use is left to the caller.
            Self::BedPlus { standard, .. } => {
                if column > *standard {
                    true
                } else if *standard >= 12 {
                    bed12_numeric(column)
                } else if *standard >= 5 {
                    bed5_numeric(column)
                } else {
                    bed_numeric(column)
                }
            }
            Self::BedGraph => matches!(column, 2..=4),
            // FLAG, POS, MAPQ, PNEXT, TLEN
            Self::Alignment => matches!(column, 2 | 4 | 5 | 8 | 9),
            // POS, QUAL
            Self::VariantCall { .. } => matches!(column, 2 | 6),
            // start, end, score
            Self::FeatureAnnotation => matches!(column, 4..=6),
        }
    }
}

/// 1-based access to the raw text fields of a record.
pub trait FieldAccess {
    /// Raw text of `column`, or `None` if the record has no such column.
    fn field(&self, column: usize) -> Option<&str>;
}

/// A single tab-delimited record, stored as owned text fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// Fields in file order.
    pub fields: Vec<String>,
}

impl Record {
    /// Create a record from fields.
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Number of fields in this record.
    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl FieldAccess for Record {
    fn field(&self, column: usize) -> Option<&str> {
        column
            .checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }
}

impl FieldAccess for Vec<String> {
    fn field(&self, column: usize) -> Option<&str> {
        column.checked_sub(1).and_then(|i| self.get(i)).map(String::as_str)
    }
}

impl FieldAccess for Vec<&str> {
    fn field(&self, column: usize) -> Option<&str> {
        column.checked_sub(1).and_then(|i| self.get(i)).copied()
    }
}
