//! Reducers over one column of a hit group.

use std::collections::HashMap;

use crate::types::FieldAccess;

use super::operation::Operation;

/// Result of a single reduction, before it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced {
    /// Numeric statistic; `None` when undefined for the group (rendered as the null value).
    Number(Option<f64>),
    /// Integer count; always defined.
    Count(usize),
    /// Delimited list; empty for an empty group.
    List(String),
    /// A single selected raw value; `None` for an empty group (rendered as the null value).
    Value(Option<String>),
}

/// Reduce `column` of `group` with `op`.
///
/// - Numeric operations parse the column as `f64` and skip values that are missing or do not
///   parse. They return `Reduced::Number(None)` if nothing is left to reduce, or if the result is
///   NaN (infinite inputs parse, and `inf + -inf` is NaN).
/// - `Count` counts records, including those whose column is missing.
/// - Text operations work on raw values and ignore records without the column.
///
/// # Panics
///
/// Panics on [`Operation::Invalid`], which validation never lets through.
pub fn reduce<R: FieldAccess>(group: &[R], column: usize, op: Operation, delimiter: &str) -> Reduced {
    if op.is_numeric() {
        return Reduced::Number(statistic(group, column, op).filter(|v| !v.is_nan()));
    }
    match op {
        Operation::Count => Reduced::Count(group.len()),
        Operation::Mode => Reduced::Value(mode(&texts(group, column), true)),
        Operation::AntiMode => Reduced::Value(mode(&texts(group, column), false)),
        Operation::Distinct => {
            let freqs = frequencies(&texts(group, column));
            Reduced::List(join(freqs.iter().map(|(v, _)| *v), delimiter))
        }
        Operation::CountDistinct => Reduced::Count(frequencies(&texts(group, column)).len()),
        Operation::DistinctOnly => {
            let freqs = frequencies(&texts(group, column));
            Reduced::List(join(
                freqs.iter().filter(|(_, n)| *n == 1).map(|(v, _)| *v),
                delimiter,
            ))
        }
        Operation::Collapse | Operation::Concat => {
            Reduced::List(join(texts(group, column).into_iter(), delimiter))
        }
        Operation::FreqAsc => Reduced::List(freq_list(&texts(group, column), false, delimiter)),
        Operation::FreqDesc => Reduced::List(freq_list(&texts(group, column), true, delimiter)),
        Operation::First => Reduced::Value(texts(group, column).first().map(|s| s.to_string())),
        Operation::Last => Reduced::Value(texts(group, column).last().map(|s| s.to_string())),
        Operation::Invalid => {
            unreachable!("invalid operation for column {column} reached evaluation")
        }
        _ => unreachable!("numeric operation {op} handled above"),
    }
}

/// Numeric statistic of `column`. Infinite inputs parse, so the result may still be NaN
/// (e.g. `inf + -inf`); the caller maps that to undefined.
fn statistic<R: FieldAccess>(group: &[R], column: usize, op: Operation) -> Option<f64> {
    let values = numbers(group, column);
    match op {
        Operation::Sum => sum(&values),
        Operation::Mean => mean(&values),
        Operation::StdDev => stddev(&values),
        Operation::SampleStdDev => sample_stddev(&values),
        Operation::Median => median(values),
        Operation::Min => values.into_iter().reduce(f64::min),
        Operation::Max => values.into_iter().reduce(f64::max),
        Operation::AbsMin => values.into_iter().map(f64::abs).reduce(f64::min),
        Operation::AbsMax => values.into_iter().map(f64::abs).reduce(f64::max),
        _ => None,
    }
}

fn numbers<R: FieldAccess>(group: &[R], column: usize) -> Vec<f64> {
    group
        .iter()
        .filter_map(|rec| rec.field(column))
        .filter_map(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .collect()
}

fn texts<R: FieldAccess>(group: &[R], column: usize) -> Vec<&str> {
    group.iter().filter_map(|rec| rec.field(column)).collect()
}

fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    sum(values).map(|s| s / values.len() as f64)
}

fn squared_deviations(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m) * (v - m)).sum())
}

fn stddev(values: &[f64]) -> Option<f64> {
    squared_deviations(values).map(|ss| (ss / values.len() as f64).sqrt())
}

fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    squared_deviations(values).map(|ss| (ss / (values.len() - 1) as f64).sqrt())
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Unique values with their counts, in first-occurrence order.
fn frequencies<'a>(values: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(&str, usize)> = Vec::new();
    for &v in values {
        match index.get(v) {
            Some(&i) => out[i].1 += 1,
            None => {
                index.insert(v, out.len());
                out.push((v, 1));
            }
        }
    }
    out
}

fn mode(values: &[&str], most: bool) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for (v, n) in frequencies(values) {
        let better = match best {
            None => true,
            Some((_, b)) if most => n > b,
            Some((_, b)) => n < b,
        };
        if better {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v.to_string())
}

fn freq_list(values: &[&str], descending: bool, delimiter: &str) -> String {
    let mut freqs = frequencies(values);
    // Stable sorts keep first-occurrence order among equal counts.
    if descending {
        freqs.sort_by(|a, b| b.1.cmp(&a.1));
    } else {
        freqs.sort_by(|a, b| a.1.cmp(&b.1));
    }
    let pairs: Vec<String> = freqs.iter().map(|(v, n)| format!("{v}:{n}")).collect();
    pairs.join(delimiter)
}

fn join<'a>(values: impl Iterator<Item = &'a str>, delimiter: &str) -> String {
    values.collect::<Vec<_>>().join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::{reduce, Reduced};
    use crate::processing::Operation;

    fn group(values: &[&'static str]) -> Vec<Vec<&'static str>> {
        values.iter().map(|v| vec!["chr1", "0", "1", *v]).collect()
    }

    fn num(values: &[&'static str], op: Operation) -> Option<f64> {
        match reduce(&group(values), 4, op, ",") {
            Reduced::Number(v) => v,
            other => panic!("expected number, got {other:?}"),
        }
    }

    fn list(values: &[&'static str], op: Operation) -> String {
        match reduce(&group(values), 4, op, ",") {
            Reduced::List(s) => s,
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn basic_numeric_reductions() {
        let vals = ["3", "-7", "1.5", "10"];
        assert_eq!(num(&vals, Operation::Sum), Some(7.5));
        assert_eq!(num(&vals, Operation::Mean), Some(1.875));
        assert_eq!(num(&vals, Operation::Min), Some(-7.0));
        assert_eq!(num(&vals, Operation::Max), Some(10.0));
        assert_eq!(num(&vals, Operation::AbsMin), Some(1.5));
        assert_eq!(num(&vals, Operation::AbsMax), Some(10.0));
    }

    #[test]
    fn numeric_reductions_are_undefined_on_empty_input() {
        for op in [
            Operation::Sum,
            Operation::Mean,
            Operation::StdDev,
            Operation::SampleStdDev,
            Operation::Median,
            Operation::Min,
            Operation::Max,
            Operation::AbsMin,
            Operation::AbsMax,
        ] {
            assert_eq!(num(&[], op), None, "{op}");
        }
    }

    #[test]
    fn unparseable_values_are_skipped() {
        assert_eq!(num(&["4", ".", "6"], Operation::Mean), Some(5.0));
        assert_eq!(num(&[".", "NA"], Operation::Sum), None);
    }

    #[test]
    fn nan_results_are_undefined() {
        let vals = ["inf", "-inf"];
        assert_eq!(num(&vals, Operation::Sum), None);
        assert_eq!(num(&vals, Operation::Mean), None);
        assert_eq!(num(&vals, Operation::StdDev), None);
        assert_eq!(num(&vals, Operation::Max), Some(f64::INFINITY));
    }

    #[test]
    fn standard_deviations() {
        let vals = ["2", "4", "4", "4", "5", "5", "7", "9"];
        assert_eq!(num(&vals, Operation::StdDev), Some(2.0));
        let sample = num(&vals, Operation::SampleStdDev).unwrap();
        assert!((sample - 2.138_089_935_299_395).abs() < 1e-12);

        assert_eq!(num(&["5"], Operation::StdDev), Some(0.0));
        assert_eq!(num(&["5"], Operation::SampleStdDev), None);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(num(&["9", "1", "5"], Operation::Median), Some(5.0));
        assert_eq!(num(&["9", "1", "5", "2"], Operation::Median), Some(3.5));
    }

    #[test]
    fn mode_and_antimode_break_ties_by_first_occurrence() {
        let g = group(&["b", "a", "a", "b", "c"]);
        assert_eq!(
            reduce(&g, 4, Operation::Mode, ","),
            Reduced::Value(Some("b".to_string()))
        );
        assert_eq!(
            reduce(&g, 4, Operation::AntiMode, ","),
            Reduced::Value(Some("c".to_string()))
        );
        let empty: Vec<Vec<&str>> = Vec::new();
        assert_eq!(reduce(&empty, 4, Operation::Mode, ","), Reduced::Value(None));
    }

    #[test]
    fn distinct_family() {
        let vals = ["x", "y", "x", "z", "y", "w"];
        assert_eq!(list(&vals, Operation::Distinct), "x,y,z,w");
        assert_eq!(list(&vals, Operation::DistinctOnly), "z,w");
        assert_eq!(
            reduce(&group(&vals), 4, Operation::CountDistinct, ","),
            Reduced::Count(4)
        );
    }

    #[test]
    fn collapse_keeps_duplicates_and_concat_matches() {
        let vals = ["x", "y", "x"];
        assert_eq!(list(&vals, Operation::Collapse), "x,y,x");
        assert_eq!(list(&vals, Operation::Concat), list(&vals, Operation::Collapse));
        assert_eq!(list(&[], Operation::Collapse), "");
    }

    #[test]
    fn frequency_lists() {
        let vals = ["a", "b", "b", "c", "c", "c", "d"];
        assert_eq!(list(&vals, Operation::FreqAsc), "a:1,d:1,b:2,c:3");
        assert_eq!(list(&vals, Operation::FreqDesc), "c:3,b:2,a:1,d:1");
    }

    #[test]
    fn first_last_and_count() {
        let g = group(&["p", "q", "r"]);
        assert_eq!(
            reduce(&g, 4, Operation::First, "|"),
            Reduced::Value(Some("p".to_string()))
        );
        assert_eq!(
            reduce(&g, 4, Operation::Last, "|"),
            Reduced::Value(Some("r".to_string()))
        );
        assert_eq!(reduce(&g, 4, Operation::Count, "|"), Reduced::Count(3));
    }

    #[test]
    fn custom_delimiter_is_used() {
        let g = group(&["a", "b"]);
        assert_eq!(
            reduce(&g, 4, Operation::Collapse, ";"),
            Reduced::List("a;b".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "invalid operation")]
    fn invalid_operation_is_a_fault() {
        let _ = reduce(&group(&["a"]), 4, Operation::Invalid, ",");
    }
}
