//! Operation catalog: names, codes, and the numeric flag.

use std::fmt;

/// Statistics that can be requested for a column of a hit group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Sum,
    Mean,
    /// Population standard deviation.
    StdDev,
    /// Bessel-corrected sample standard deviation.
    SampleStdDev,
    Median,
    /// Most frequent value.
    Mode,
    /// Least frequent value.
    AntiMode,
    Min,
    Max,
    /// Smallest absolute value.
    AbsMin,
    /// Largest absolute value.
    AbsMax,
    /// Number of records in the group.
    Count,
    /// Unique values in first-occurrence order.
    Distinct,
    /// Number of unique values.
    CountDistinct,
    /// Values that occur exactly once.
    DistinctOnly,
    /// All values, duplicates kept.
    Collapse,
    /// Alias of [`Operation::Collapse`].
    Concat,
    /// `value:count` pairs, least frequent first.
    FreqAsc,
    /// `value:count` pairs, most frequent first.
    FreqDesc,
    First,
    Last,
    /// Name not present in the catalog.
    Invalid,
}

impl Operation {
    /// Every valid operation, in catalog order.
    pub const ALL: [Operation; 21] = [
        Self::Sum,
        Self::Mean,
        Self::StdDev,
        Self::SampleStdDev,
        Self::Median,
        Self::Mode,
        Self::AntiMode,
        Self::Min,
        Self::Max,
        Self::AbsMin,
        Self::AbsMax,
        Self::Count,
        Self::Distinct,
        Self::CountDistinct,
        Self::DistinctOnly,
        Self::Collapse,
        Self::Concat,
        Self::FreqAsc,
        Self::FreqDesc,
        Self::First,
        Self::Last,
    ];

    /// Look up an operation by its user-facing name.
    ///
    /// Unknown names map to [`Operation::Invalid`]; callers decide whether that is an error.
    pub fn lookup(name: &str) -> Self {
        match name {
            "sum" => Self::Sum,
            "mean" => Self::Mean,
            "stddev" => Self::StdDev,
            "sample_stddev" => Self::SampleStdDev,
            "median" => Self::Median,
            "mode" => Self::Mode,
            "antimode" => Self::AntiMode,
            "min" => Self::Min,
            "max" => Self::Max,
            "absmin" => Self::AbsMin,
            "absmax" => Self::AbsMax,
            "count" => Self::Count,
            "distinct" => Self::Distinct,
            "count_distinct" => Self::CountDistinct,
            "distinct_only" => Self::DistinctOnly,
            "collapse" => Self::Collapse,
            "concat" => Self::Concat,
            "freq_asc" => Self::FreqAsc,
            "freq_desc" => Self::FreqDesc,
            "first" => Self::First,
            "last" => Self::Last,
            _ => Self::Invalid,
        }
    }

    /// User-facing name of the operation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::StdDev => "stddev",
            Self::SampleStdDev => "sample_stddev",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::AntiMode => "antimode",
            Self::Min => "min",
            Self::Max => "max",
            Self::AbsMin => "absmin",
            Self::AbsMax => "absmax",
            Self::Count => "count",
            Self::Distinct => "distinct",
            Self::CountDistinct => "count_distinct",
            Self::DistinctOnly => "distinct_only",
            Self::Collapse => "collapse",
            Self::Concat => "concat",
            Self::FreqAsc => "freq_asc",
            Self::FreqDesc => "freq_desc",
            Self::First => "first",
            Self::Last => "last",
            Self::Invalid => "invalid",
        }
    }

    /// Whether the operation needs a numeric source column.
    ///
    /// [`Operation::Invalid`] is reported as non-numeric.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Sum
                | Self::Mean
                | Self::StdDev
                | Self::SampleStdDev
                | Self::Median
                | Self::Min
                | Self::Max
                | Self::AbsMin
                | Self::AbsMax
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
