//! Tab-delimited record reader.

use std::io::Read;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::Record;

/// Read every record of a tab-delimited genomic text file.
///
/// Rules:
///
/// - Fields are separated by a single tab; quotes have no special meaning.
/// - Blank lines, `#` comment lines, UCSC `track` / `browser` lines, and SAM `@` header lines are
///   skipped.
/// - Every record must have at least `min_width` fields.
pub fn read_records_from_path(path: impl AsRef<Path>, min_width: usize) -> LoadResult<Vec<Record>> {
    let mut rdr = reader_builder().from_path(path)?;
    read_records_from_reader(&mut rdr, min_width)
}

/// Read records from an existing reader (e.g. stdin or an in-memory buffer).
pub fn read_records_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    min_width: usize,
) -> LoadResult<Vec<Record>> {
    let mut out = Vec::new();
    for (idx0, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx0 + 1);

        let first = record.get(0).unwrap_or("");
        if first.starts_with("track") || first.starts_with("browser") || first.starts_with('@') {
            continue;
        }
        if record.len() < min_width {
            return Err(LoadError::Malformed {
                line,
                message: format!(
                    "expected at least {min_width} tab-delimited fields, found {}",
                    record.len()
                ),
            });
        }
        out.push(record.iter().collect());
    }
    Ok(out)
}

/// A [`csv::ReaderBuilder`] configured for genomic text formats.
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'));
    builder
}
