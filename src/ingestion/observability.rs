//! Reporting of record-file loads.
//!
//! [`load_records`](super::load_records) tells a [`LoadObserver`] which layout a file was read as,
//! or why it could not be used. Two observers ship with the crate: [`StdErrObserver`] for
//! interactive runs and [`FileObserver`] for a tab-separated load log.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;
use crate::types::RecordLayout;

use super::unified::RecordFormat;

/// How serious a failed load is. Ordered, so it can be compared against an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// The file was readable but its name or contents could not be used.
    Error,
    /// The file could not be read at all.
    Critical,
}

impl fmt::Display for LoadSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Critical => "critical",
        })
    }
}

/// The file a load was attempted on.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub path: PathBuf,
    pub format: RecordFormat,
}

impl LoadContext {
    /// `path` or `path:line`, the way compilers point at input.
    pub fn location(&self, line: Option<usize>) -> String {
        match line {
            Some(line) => format!("{}:{line}", self.path.display()),
            None => self.path.display().to_string(),
        }
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Records kept after header and comment lines were skipped.
    pub records: usize,
    /// Layout column operations will be validated against.
    pub layout: RecordLayout,
}

/// Outcome of a failed load.
#[derive(Debug)]
pub struct LoadFailure<'a> {
    pub severity: LoadSeverity,
    /// Set when `severity` reached the caller's alert threshold.
    pub alert: bool,
    pub error: &'a LoadError,
}

impl LoadFailure<'_> {
    /// Input line the failure points at, if any.
    pub fn line(&self) -> Option<usize> {
        self.error.line()
    }
}

/// Receives one callback per [`load_records`](super::load_records) call.
pub trait LoadObserver: Send + Sync {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats);

    fn on_failed(&self, ctx: &LoadContext, failure: &LoadFailure<'_>);
}

/// Prints one line per load to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[colops] {}: {} records read as {} ({})",
            ctx.location(None),
            stats.records,
            stats.layout,
            ctx.format
        );
    }

    fn on_failed(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        let marker = if failure.alert { "ALERT " } else { "" };
        eprintln!(
            "[colops] {marker}{}: {}: {}",
            failure.severity,
            ctx.location(failure.line()),
            failure.error
        );
    }
}

/// Appends one tab-separated line per load to a log file.
///
/// Lines are `millis  loaded  format  layout  records  path` on success and
/// `millis  failed|alert  severity  path[:line]  message` on failure.
#[derive(Debug)]
pub struct FileObserver {
    file: Mutex<File>,
}

impl FileObserver {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    // Observers cannot fail a load, so write errors are dropped.
    fn write_line(&self, line: fmt::Arguments<'_>) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(file, "{}\t{line}", unix_millis());
    }
}

impl LoadObserver for FileObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        self.write_line(format_args!(
            "loaded\t{}\t{}\t{}\t{}",
            ctx.format,
            stats.layout,
            stats.records,
            ctx.path.display()
        ));
    }

    fn on_failed(&self, ctx: &LoadContext, failure: &LoadFailure<'_>) {
        let event = if failure.alert { "alert" } else { "failed" };
        // Messages may span lines (csv errors); keep one log line per load.
        let message = failure.error.to_string().replace(['\n', '\t'], " ");
        self.write_line(format_args!(
            "{event}\t{}\t{}\t{message}",
            failure.severity,
            ctx.location(failure.line())
        ));
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}
