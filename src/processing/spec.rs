//! Parsing and validation of `columns` / `operations` requests.
//!
//! A request is two comma-delimited lists, e.g. `-c 5,4,6 -o sum,mean,count`. The lists are paired
//! index by index; a list with a single entry is broadcast against the other list.

use std::fmt;

use crate::error::{ValidationError, ValidationResult};
use crate::types::{RecordKind, RecordSchema};

use super::operation::Operation;

/// One validated (column, operation) pair. Columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOp {
    pub column: usize,
    pub operation: Operation,
}

/// Ordered, validated list of (column, operation) pairs.
///
/// Only [`ColumnOpSpec::validate`] builds one, so every pair is known to be legal for the schema it
/// was validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOpSpec {
    pairs: Vec<ColumnOp>,
}

impl ColumnOpSpec {
    /// Parse and validate `columns` and `operations` against `schema`.
    ///
    /// Validation stops at the first problem; no partial spec is returned.
    ///
    /// ```rust
    /// use interval_colops::processing::{ColumnOpSpec, Operation};
    /// use interval_colops::types::RecordLayout;
    ///
    /// let spec = ColumnOpSpec::validate("5", "sum,count", &RecordLayout::Bed6).unwrap();
    /// assert_eq!(spec.len(), 2);
    /// assert_eq!(spec.pairs()[1].operation, Operation::Count);
    /// ```
    pub fn validate<S>(columns: &str, operations: &str, schema: &S) -> ValidationResult<Self>
    where
        S: RecordSchema + ?Sized,
    {
        let col_tokens = tokenize(columns);
        let op_tokens = tokenize(operations);
        let num_cols = col_tokens.len();
        let num_ops = op_tokens.len();

        if num_cols < 1 || num_ops < 1 {
            return Err(ValidationError::MissingSpec);
        }
        if num_cols > 1 && num_ops > 1 && num_cols != num_ops {
            return Err(ValidationError::CountMismatch {
                columns: num_cols,
                operations: num_ops,
            });
        }
        if schema.kind() == RecordKind::Alignment {
            return Err(ValidationError::UnsupportedRecordKind {
                kind: schema.kind().to_string(),
            });
        }

        let field_count = schema.field_count();
        let n = num_cols.max(num_ops);
        let mut pairs = Vec::with_capacity(n);
        for i in 0..n {
            let col_token = col_tokens[if num_cols > 1 { i } else { 0 }];
            let column = parse_column(col_token)?;
            if column < 1 || column > field_count {
                return Err(ValidationError::ColumnOutOfRange {
                    column,
                    field_count,
                });
            }

            let op_token = op_tokens[if num_ops > 1 { i } else { 0 }];
            let operation = Operation::lookup(op_token);
            if operation == Operation::Invalid {
                return Err(ValidationError::UnknownOperation {
                    token: op_token.to_string(),
                });
            }
            if operation.is_numeric() && !schema.is_numeric_field(column) {
                return Err(ValidationError::NonNumericColumn { column, operation });
            }

            pairs.push(ColumnOp { column, operation });
        }

        Ok(Self { pairs })
    }

    /// Validated pairs in request order.
    pub fn pairs(&self) -> &[ColumnOp] {
        &self.pairs
    }

    /// Number of pairs, which is also the number of fields in every output fragment.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for ColumnOpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", pair.column, pair.operation)?;
        }
        Ok(())
    }
}

fn tokenize(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',').map(str::trim).collect()
}

fn parse_column(token: &str) -> ValidationResult<usize> {
    token
        .parse::<usize>()
        .map_err(|_| ValidationError::InvalidColumn {
            token: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{ColumnOp, ColumnOpSpec};
    use crate::error::ValidationError;
    use crate::processing::Operation;
    use crate::types::{RecordKind, RecordLayout, RecordSchema};

    fn ops(spec: &ColumnOpSpec) -> Vec<(usize, Operation)> {
        spec.pairs().iter().map(|p| (p.column, p.operation)).collect()
    }

    #[test]
    fn equal_counts_pair_in_order() {
        let spec = ColumnOpSpec::validate("5,2,3", "sum,mean,count", &RecordLayout::Bed6).unwrap();
        assert_eq!(
            ops(&spec),
            vec![
                (5, Operation::Sum),
                (2, Operation::Mean),
                (3, Operation::Count),
            ]
        );
    }

    #[test]
    fn single_column_broadcasts_over_operations() {
        let spec = ColumnOpSpec::validate("5", "min,max,collapse", &RecordLayout::Bed5).unwrap();
        assert_eq!(
            ops(&spec),
            vec![
                (5, Operation::Min),
                (5, Operation::Max),
                (5, Operation::Collapse),
            ]
        );
    }

    #[test]
    fn single_operation_broadcasts_over_columns() {
        let spec = ColumnOpSpec::validate("1,4,6", "distinct", &RecordLayout::Bed6).unwrap();
        assert_eq!(
            ops(&spec),
            vec![
                (1, Operation::Distinct),
                (4, Operation::Distinct),
                (6, Operation::Distinct),
            ]
        );
    }

    #[test]
    fn unequal_plural_lists_are_rejected() {
        let err = ColumnOpSpec::validate("1,2,3", "sum,mean", &RecordLayout::Bed6).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CountMismatch {
                columns: 3,
                operations: 2
            }
        );
    }

    #[test]
    fn empty_lists_are_missing() {
        assert_eq!(
            ColumnOpSpec::validate("", "sum", &RecordLayout::Bed6).unwrap_err(),
            ValidationError::MissingSpec
        );
        assert_eq!(
            ColumnOpSpec::validate("5", "  ", &RecordLayout::Bed6).unwrap_err(),
            ValidationError::MissingSpec
        );
    }

    #[test]
    fn out_of_range_columns_report_field_count() {
        assert_eq!(
            ColumnOpSpec::validate("0", "count", &RecordLayout::Bed6).unwrap_err(),
            ValidationError::ColumnOutOfRange {
                column: 0,
                field_count: 6
            }
        );
        let err = ColumnOpSpec::validate("7", "count", &RecordLayout::Bed6).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ColumnOutOfRange {
                column: 7,
                field_count: 6
            }
        );
        assert!(err.to_string().contains("only has fields 1 - 6"));
    }

    #[test]
    fn non_integer_columns_are_invalid() {
        assert_eq!(
            ColumnOpSpec::validate("five", "count", &RecordLayout::Bed6).unwrap_err(),
            ValidationError::InvalidColumn {
                token: "five".to_string()
            }
        );
        assert!(matches!(
            ColumnOpSpec::validate("-2", "count", &RecordLayout::Bed6),
            Err(ValidationError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn unknown_operation_names_the_token() {
        let err = ColumnOpSpec::validate("5", "sum,avg", &RecordLayout::Bed6).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOperation {
                token: "avg".to_string()
            }
        );
        assert_eq!(err.to_string(), "avg is not a valid operation");
    }

    #[test]
    fn numeric_operation_requires_numeric_column() {
        let err = ColumnOpSpec::validate("4", "mean", &RecordLayout::Bed4).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericColumn {
                column: 4,
                operation: Operation::Mean
            }
        );

        let spec = ColumnOpSpec::validate("4", "mean", &RecordLayout::BedGraph).unwrap();
        assert_eq!(ops(&spec), vec![(4, Operation::Mean)]);

        // Non-numeric operations are fine on text columns.
        assert!(ColumnOpSpec::validate("4", "mode", &RecordLayout::Bed4).is_ok());
    }

    #[test]
    fn alignment_records_are_rejected_before_parsing() {
        // Even garbage tokens are not looked at.
        let err = ColumnOpSpec::validate("x", "nope", &RecordLayout::Alignment).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedRecordKind {
                kind: "BAM".to_string()
            }
        );
    }

    #[test]
    fn count_mismatch_is_checked_before_record_kind() {
        let err = ColumnOpSpec::validate("1,2", "sum,mean,max", &RecordLayout::Alignment).unwrap_err();
        assert!(matches!(err, ValidationError::CountMismatch { .. }));
    }

    struct SixNumericColumns;

    impl RecordSchema for SixNumericColumns {
        fn kind(&self) -> RecordKind {
            RecordKind::BedPlus
        }
        fn field_count(&self) -> usize {
            6
        }
        fn is_numeric_field(&self, _column: usize) -> bool {
            true
        }
    }

    #[test]
    fn custom_schemas_are_accepted() {
        let spec = ColumnOpSpec::validate("1", "sum", &SixNumericColumns).unwrap();
        assert_eq!(
            spec.pairs(),
            &[ColumnOp {
                column: 1,
                operation: Operation::Sum
            }]
        );
    }

    #[test]
    fn display_lists_pairs() {
        let spec = ColumnOpSpec::validate("5,4", "sum,distinct", &RecordLayout::Bed6).unwrap();
        assert_eq!(spec.to_string(), "5:sum,4:distinct");
    }
}
