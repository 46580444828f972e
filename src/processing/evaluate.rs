//! Per-group evaluation and output assembly.

use crate::types::FieldAccess;

use super::options::EngineConfig;
use super::reduce::{reduce, Reduced};
use super::spec::ColumnOpSpec;

/// Evaluate every (column, operation) pair of `spec` over `group` and join the results with tabs.
///
/// The output always has exactly `spec.len()` tab-separated fields, including for an empty group.
/// Undefined numeric statistics are rendered as `config.null_value`.
///
/// ```rust
/// use interval_colops::processing::{evaluate, ColumnOpSpec, EngineConfig};
/// use interval_colops::types::RecordLayout;
///
/// let spec = ColumnOpSpec::validate("5", "sum,count", &RecordLayout::Bed6).unwrap();
/// let group = vec![
///     vec!["chr1", "10", "20", "a", "10", "+"],
///     vec!["chr1", "15", "25", "b", "20", "+"],
///     vec!["chr1", "18", "30", "c", "30", "-"],
/// ];
/// assert_eq!(evaluate(&spec, &group, &EngineConfig::default()), "60\t3");
/// ```
pub fn evaluate<R: FieldAccess>(spec: &ColumnOpSpec, group: &[R], config: &EngineConfig) -> String {
    let fields: Vec<String> = spec
        .pairs()
        .iter()
        .map(|pair| render(reduce(group, pair.column, pair.operation, &config.delimiter), config))
        .collect();
    fields.join("\t")
}

fn render(value: Reduced, config: &EngineConfig) -> String {
    match value {
        Reduced::Number(Some(v)) => format_number(v, config.precision),
        Reduced::Number(None) | Reduced::Value(None) => config.null_value.clone(),
        Reduced::Count(n) => n.to_string(),
        Reduced::List(s) => s,
        Reduced::Value(Some(s)) => s,
    }
}

fn format_number(v: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{v:.p$}"),
        None => format!("{v}"),
    }
}

#[cfg(test)]
mod tests {
    use super::evaluate;
    use crate::processing::{ColumnOpSpec, EngineConfig};
    use crate::types::RecordLayout;

    fn bed6(scores: &[&'static str]) -> Vec<Vec<&'static str>> {
        scores
            .iter()
            .map(|s| vec!["chr1", "100", "200", "feat", *s, "+"])
            .collect()
    }

    #[test]
    fn sum_and_count_over_score_column() {
        let spec = ColumnOpSpec::validate("5", "sum,count", &RecordLayout::Bed6).unwrap();
        let out = evaluate(&spec, &bed6(&["10", "20", "30"]), &EngineConfig::default());
        assert_eq!(out, "60\t3");
    }

    #[test]
    fn broadcast_operation_over_repeated_column() {
        let spec = ColumnOpSpec::validate("4,4", "mode", &RecordLayout::Bed4).unwrap();
        let group = vec![
            vec!["chr1", "1", "2", "x"],
            vec!["chr1", "1", "2", "y"],
            vec!["chr1", "1", "2", "x"],
        ];
        assert_eq!(evaluate(&spec, &group, &EngineConfig::default()), "x\tx");
    }

    #[test]
    fn empty_group_keeps_field_count() {
        let spec = ColumnOpSpec::validate(
            "5",
            "count,sum,mean,min,max,collapse,distinct",
            &RecordLayout::Bed6,
        )
        .unwrap();
        let out = evaluate(&spec, &bed6(&[]), &EngineConfig::default());
        assert_eq!(out, "0\t.\t.\t.\t.\t\t");
        assert_eq!(out.split('\t').count(), spec.len());
    }

    #[test]
    fn single_value_deviations() {
        let spec = ColumnOpSpec::validate("5", "stddev,sample_stddev", &RecordLayout::Bed6).unwrap();
        let out = evaluate(&spec, &bed6(&["42"]), &EngineConfig::default());
        assert_eq!(out, "0\t.");
    }

    #[test]
    fn nan_statistics_render_as_null_value() {
        let spec = ColumnOpSpec::validate("4", "sum,mean,stddev", &RecordLayout::BedGraph).unwrap();
        let group = vec![
            vec!["chr1", "0", "10", "inf"],
            vec!["chr1", "10", "20", "-inf"],
        ];
        assert_eq!(evaluate(&spec, &group, &EngineConfig::default()), ".\t.\t.");
    }

    #[test]
    fn null_value_and_delimiter_are_configurable() {
        let spec = ColumnOpSpec::validate("5", "mean,collapse", &RecordLayout::Bed6).unwrap();
        let config = EngineConfig {
            delimiter: "|".to_string(),
            null_value: "NA".to_string(),
            precision: None,
        };
        assert_eq!(evaluate(&spec, &bed6(&[]), &config), "NA\t");
        assert_eq!(evaluate(&spec, &bed6(&["1", "2"]), &config), "1.5\t1|2");
    }

    #[test]
    fn precision_applies_to_numbers_only() {
        let spec = ColumnOpSpec::validate("5", "mean,count", &RecordLayout::Bed6).unwrap();
        let config = EngineConfig {
            precision: Some(3),
            ..EngineConfig::default()
        };
        assert_eq!(evaluate(&spec, &bed6(&["1", "2"]), &config), "1.500\t2");
    }

    #[test]
    fn collapse_and_concat_are_identical() {
        let spec = ColumnOpSpec::validate("4", "collapse,concat", &RecordLayout::Bed6).unwrap();
        let out = evaluate(&spec, &bed6(&["1", "1", "2"]), &EngineConfig::default());
        let parts: Vec<&str> = out.split('\t').collect();
        assert_eq!(parts[0], parts[1]);
        assert_eq!(parts[0], "feat,feat,feat");
    }

    #[test]
    fn evaluation_is_repeatable() {
        let spec = ColumnOpSpec::validate("5", "freq_desc,median", &RecordLayout::Bed6).unwrap();
        let group = bed6(&["3", "1", "3", "2"]);
        let config = EngineConfig::default();
        let first = evaluate(&spec, &group, &config);
        assert_eq!(first, "3:2,1:1,2:1\t2.5");
        assert_eq!(evaluate(&spec, &group, &config), first);
    }
}
