//! Dataset export.
//!
//! Files written into the output directory:
//! - `all_messages.json` - every event, sorted by timestamp
//! - `data_{year}.json` - one file per calendar year, same schema and order
//! - `summary_stats.json` - [`SummaryStats`] object
//!
//! Partition files left over from earlier runs whose year no longer occurs
//! in the dataset are removed, so the directory always mirrors one run.
//!
//! Each file is written independently and atomically. A failure on one file
//! is recorded in the [`ExportReport`] and the remaining files are still
//! attempted.
//!
//! # Example
//!
//! ```rust
//! use chat_timeline::core::output::{export_events, year_file_name};
//! use chat_timeline::event::Event;
//! use chat_timeline::parser::Platform;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let events = vec![Event::new(ts, "You", Platform::WhatsApp, "hi")];
//!
//! let dir = tempfile::tempdir().unwrap();
//! let report = export_events(&events, dir.path());
//! assert!(report.is_success());
//! assert!(dir.path().join(year_file_name(2023)).exists());
//! ```

mod json_writer;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

pub use json_writer::{to_json, write_json};

use crate::core::stats::SummaryStats;
use crate::error::{Result, TimelineError};
use crate::event::Event;

/// File name of the full dataset.
pub const ALL_MESSAGES_FILE: &str = "all_messages.json";

/// File name of the summary statistics.
pub const SUMMARY_STATS_FILE: &str = "summary_stats.json";

/// File name of the partition holding `year`.
pub fn year_file_name(year: i32) -> String {
    format!("data_{year}.json")
}

/// Returns the year encoded in a partition file name, if `name` is one.
fn partition_year(name: &str) -> Option<i32> {
    let year = name
        .strip_prefix("data_")?
        .strip_suffix(".json")?
        .parse::<i32>()
        .ok()?;
    (year_file_name(year) == name).then_some(year)
}

/// A file that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Number of events (or `1` for a single object) in the file.
    pub records: usize,
}

/// Outcome of writing the output files.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<WrittenFile>,
    pub failures: Vec<TimelineError>,
}

impl ExportReport {
    /// Returns `true` if every attempted file was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records the outcome of writing one file.
    pub fn push(&mut self, result: Result<WrittenFile>) {
        match result {
            Ok(file) => {
                debug!(path = %file.path.display(), records = file.records, "Wrote file");
                self.written.push(file);
            }
            Err(e) => {
                error!(error = %e, "Failed to write output file");
                self.failures.push(e);
            }
        }
    }
}

/// Groups events by calendar year, keeping their relative order.
pub fn partition_by_year<'a>(events: &[&'a Event]) -> BTreeMap<i32, Vec<&'a Event>> {
    let mut years: BTreeMap<i32, Vec<&Event>> = BTreeMap::new();
    for &event in events {
        years.entry(event.year()).or_default().push(event);
    }
    years
}

fn write_events(events: &[&Event], path: PathBuf) -> Result<WrittenFile> {
    write_json(events, &path)?;
    Ok(WrittenFile {
        path,
        records: events.len(),
    })
}

/// Deletes `data_{year}.json` files in `output_dir` whose year is not in `keep`.
fn remove_stale_partitions<V>(
    output_dir: &Path,
    keep: &BTreeMap<i32, V>,
    report: &mut ExportReport,
) {
    let entries = match fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %output_dir.display(), error = %e, "Cannot list output directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(year) = name.to_str().and_then(partition_year) else {
            continue;
        };
        if keep.contains_key(&year) {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => info!(path = %path.display(), "Removed stale partition"),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to remove stale partition");
                report.failures.push(TimelineError::write(path, e));
            }
        }
    }
}

/// Writes the full dataset and one partition per year into `output_dir`.
///
/// Events are stably sorted by timestamp before writing; the input slice is
/// not modified. The directory is created if needed, and partitions for
/// years absent from `events` are deleted.
pub fn export_events(events: &[Event], output_dir: &Path) -> ExportReport {
    let mut report = ExportReport::default();

    if let Err(e) = fs::create_dir_all(output_dir) {
        report.push(Err(TimelineError::write(output_dir, e)));
        return report;
    }

    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);

    report.push(write_events(&sorted, output_dir.join(ALL_MESSAGES_FILE)));

    let years = partition_by_year(&sorted);
    for (year, partition) in &years {
        report.push(write_events(partition, output_dir.join(year_file_name(*year))));
    }
    remove_stale_partitions(output_dir, &years, &mut report);

    info!(
        events = sorted.len(),
        years = years.len(),
        failures = report.failures.len(),
        "Exported events"
    );
    report
}

/// Writes `summary_stats.json` into `output_dir`.
///
/// # Errors
///
/// Returns [`TimelineError::Write`] if the directory or file cannot be
/// written.
pub fn export_summary(stats: &SummaryStats, output_dir: &Path) -> Result<WrittenFile> {
    fs::create_dir_all(output_dir).map_err(|e| TimelineError::write(output_dir, e))?;
    let path = output_dir.join(SUMMARY_STATS_FILE);
    write_json(stats, &path)?;
    Ok(WrittenFile { path, records: 1 })
}
