//! Lazy, month-by-month reading of a Semantic Location History folder.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use tl_core::TimelineEvent;
use tracing::{debug, info, warn};

use crate::month::Month;
use crate::normalize::normalize_value;
use crate::raw::TimelineDocument;

const BUFFER_SIZE: usize = 64 * 1024;

/// A month file that exists but could not be loaded.
#[derive(Debug, Error)]
pub enum TakeoutError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// What the reader saw so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub months_read: usize,
    pub months_missing: usize,
    /// Events handed out.
    pub events: usize,
    /// Entries skipped because they failed validation.
    pub malformed: usize,
}

/// Yields the events of one year, January first, holding a single month in
/// memory at a time.
///
/// Missing month files are skipped with a warning. Malformed entries are
/// skipped with a warning and counted. A month file that cannot be read or
/// parsed is yielded as an error; iteration may continue with the next month.
#[derive(Debug)]
pub struct TakeoutReader {
    folder: PathBuf,
    year: i32,
    timezone: Tz,
    months: std::array::IntoIter<Month, 12>,
    current: Option<MonthBatch>,
    report: LoadReport,
}

#[derive(Debug)]
struct MonthBatch {
    month: Month,
    entries: std::iter::Enumerate<std::vec::IntoIter<serde_json::Value>>,
}

impl TakeoutReader {
    /// Reads `<folder>/<year>/<year>_<MONTH>.json` for every month, converting
    /// timestamps to `timezone`.
    pub fn new(folder: impl Into<PathBuf>, year: i32, timezone: Tz) -> Self {
        Self {
            folder: folder.into(),
            year,
            timezone,
            months: Month::ALL.into_iter(),
            current: None,
            report: LoadReport::default(),
        }
    }

    /// Counts so far. Final once the reader has returned `None`.
    pub const fn report(&self) -> LoadReport {
        self.report
    }

    /// Path of the file holding `month`.
    pub fn month_path(&self, month: Month) -> PathBuf {
        self.folder.join(month.file_name(self.year))
    }

    /// Next valid event of the month in progress, skipping malformed entries.
    fn next_in_batch(&mut self) -> Option<TimelineEvent> {
        let batch = self.current.as_mut()?;
        for (position, entry) in batch.entries.by_ref() {
            match normalize_value(entry, self.timezone) {
                Ok(event) => {
                    self.report.events += 1;
                    return Some(event);
                }
                Err(err) => {
                    self.report.malformed += 1;
                    warn!(
                        month = %batch.month,
                        position,
                        error = %err,
                        "skipping malformed timeline entry"
                    );
                }
            }
        }
        self.current = None;
        None
    }
}

impl Iterator for TakeoutReader {
    type Item = Result<TimelineEvent, TakeoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.next_in_batch() {
                return Some(Ok(event));
            }

            let month = self.months.next()?;
            let path = self.month_path(month);
            if !path.exists() {
                self.report.months_missing += 1;
                warn!(path = %path.display(), %month, year = self.year, "month file not found, skipping");
                continue;
            }

            info!(path = %path.display(), "reading month file");
            let document = match load_document(&path) {
                Ok(document) => document,
                Err(err) => return Some(Err(err)),
            };
            self.report.months_read += 1;
            debug!(
                %month,
                entries = document.timeline_objects.len(),
                "loaded month"
            );
            self.current = Some(MonthBatch {
                month,
                entries: document.timeline_objects.into_iter().enumerate(),
            });
        }
    }
}

impl std::iter::FusedIterator for TakeoutReader {}

fn load_document(path: &Path) -> Result<TimelineDocument, TakeoutError> {
    let file = File::open(path).map_err(|source| TakeoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);
    serde_json::from_reader(reader).map_err(|source| TakeoutError::Json {
        path: path.to_path_buf(),
        source,
    })
}
