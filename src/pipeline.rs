//! End-to-end pipeline driver.
//!
//! A run goes through these stages, handing the event collection from one
//! to the next by value:
//!
//! 1. load the optional timezone configuration
//! 2. parse every configured export file
//! 3. normalize local hours
//! 4. sort and compute reply latency
//! 5. compute summary statistics
//! 6. write the dataset, year partitions and statistics
//!
//! Missing or unreadable inputs are reported per source and do not stop the
//! run. An empty dataset or an invalid timezone configuration does.
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_timeline::config::PipelineConfig;
//! use chat_timeline::pipeline::Pipeline;
//!
//! let report = Pipeline::new(PipelineConfig::new().with_output_dir("public/data")).run()?;
//! println!("{} events exported", report.events);
//! # Ok::<(), chat_timeline::TimelineError>(())
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::config::{PipelineConfig, TimezoneConfig};
use crate::core::{
    ExportReport, SummaryStats, compute_reply_latency, export_events, export_summary,
    normalize_timezone,
};
use crate::error::{Result, TimelineError};
use crate::event::Event;
use crate::parser::{ParsedExport, Parser, Platform, create_parser};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// The file was read and parsed.
    Parsed,
    /// The file does not exist.
    Missing,
    /// The file could not be read or is not a usable document.
    Failed(String),
}

/// Per-file parsing outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub platform: Platform,
    pub path: PathBuf,
    pub status: SourceStatus,
    pub events: usize,
    pub dropped: usize,
    pub unknown_senders: BTreeSet<String>,
}

/// Outcome of a full run.
#[derive(Debug)]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    /// Whether a timezone configuration was found and applied.
    pub timezone_applied: bool,
    /// Number of events exported.
    pub events: usize,
    pub stats: SummaryStats,
    pub export: ExportReport,
}

impl RunReport {
    /// Returns `true` if every output file was written.
    pub fn is_success(&self) -> bool {
        self.export.is_success()
    }

    /// Total records dropped across all sources.
    pub fn dropped(&self) -> usize {
        self.sources.iter().map(|s| s.dropped).sum()
    }
}

/// Drives one run over a [`PipelineConfig`].
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parses every configured input, in configuration order.
    ///
    /// Returns the concatenated events and one report per input file.
    /// Per-file problems are logged and reported, never returned as errors.
    pub fn load_sources(&self) -> (Vec<Event>, Vec<SourceReport>) {
        let mut events = Vec::new();
        let mut reports = Vec::new();

        for &platform in Platform::all() {
            let inputs = self.config.inputs(platform);
            let Some(parser) = create_parser(platform, &self.config) else {
                if !inputs.is_empty() {
                    warn!(platform = %platform, "Parser not enabled, skipping inputs");
                }
                continue;
            };

            for path in inputs {
                let (parsed, status) = parse_source(parser.as_ref(), &path);
                reports.push(SourceReport {
                    platform,
                    path,
                    status,
                    events: parsed.events.len(),
                    dropped: parsed.dropped,
                    unknown_senders: parsed.unknown_senders,
                });
                events.extend(parsed.events);
            }
        }

        (events, reports)
    }

    /// Executes the full pipeline.
    ///
    /// # Errors
    ///
    /// - [`TimelineError::InvalidConfig`] if the timezone configuration exists
    ///   but cannot be loaded
    /// - [`TimelineError::EmptyDataset`] if no source produced any event
    ///
    /// Output write failures are not errors; they are collected in
    /// [`RunReport::export`].
    pub fn run(&self) -> Result<RunReport> {
        let timezone = TimezoneConfig::load(&self.config.timezone_config_path())?;

        let (events, sources) = self.load_sources();
        if events.is_empty() {
            error!("No events parsed from any source");
            return Err(TimelineError::EmptyDataset);
        }
        info!(events = events.len(), sources = sources.len(), "Parsed sources");

        let events = normalize_timezone(events, timezone.as_ref());
        let events = compute_reply_latency(events);
        let stats = SummaryStats::from_events(&events)?;

        let mut export = export_events(&events, &self.config.output_dir);
        export.push(export_summary(&stats, &self.config.output_dir));

        info!(
            events = events.len(),
            files = export.written.len(),
            failures = export.failures.len(),
            output_dir = %self.config.output_dir.display(),
            "Pipeline finished"
        );

        Ok(RunReport {
            sources,
            timezone_applied: timezone.is_some(),
            events: events.len(),
            stats,
            export,
        })
    }
}

/// Parses one file, turning failures into a status.
fn parse_source(parser: &dyn Parser, path: &std::path::Path) -> (ParsedExport, SourceStatus) {
    match parser.parse(path) {
        Ok(parsed) => {
            info!(
                parser = parser.name(),
                path = %path.display(),
                events = parsed.events.len(),
                "Parsed export"
            );
            if parsed.dropped > 0 {
                warn!(path = %path.display(), dropped = parsed.dropped, "Dropped unparseable records");
            }
            if !parsed.unknown_senders.is_empty() {
                warn!(
                    path = %path.display(),
                    senders = ?parsed.unknown_senders,
                    "Senders matched neither participant"
                );
            }
            (parsed, SourceStatus::Parsed)
        }
        Err(e) if e.is_not_found() => {
            warn!(parser = parser.name(), path = %path.display(), "Export file not found, skipping");
            (ParsedExport::new(), SourceStatus::Missing)
        }
        Err(e) => {
            error!(parser = parser.name(), path = %path.display(), error = %e, "Failed to parse export");
            (ParsedExport::new(), SourceStatus::Failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Participants;
    use std::fs;
    use tempfile::tempdir;

    fn config_in(root: &std::path::Path) -> PipelineConfig {
        PipelineConfig::new()
            .with_source_dir(root.join("raw"))
            .with_output_dir(root.join("out"))
            .with_config_dir(root.join("config"))
            .with_participants(Participants::new("You", "Partner"))
    }

    #[test]
    fn test_missing_sources_are_reported() {
        let dir = tempdir().unwrap();
        let (events, reports) = Pipeline::new(config_in(dir.path())).load_sources();

        assert!(events.is_empty());
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.status == SourceStatus::Missing));
    }

    #[test]
    fn test_run_empty_dataset() {
        let dir = tempdir().unwrap();
        let err = Pipeline::new(config_in(dir.path())).run().unwrap_err();
        assert!(err.is_empty_dataset());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_malformed_instagram_is_not_fatal() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("raw");
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("whatsapp.txt"), "[1/15/2024, 10:30:00] You: hi\n").unwrap();
        fs::write(raw.join("instagram_message_1.json"), "{broken").unwrap();

        let report = Pipeline::new(config_in(dir.path())).run().unwrap();

        assert_eq!(report.events, 1);
        assert!(matches!(report.sources[1].status, SourceStatus::Failed(_)));
        assert!(report.is_success());
        assert!(!report.timezone_applied);
    }

    #[test]
    fn test_invalid_timezone_config_is_fatal() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("raw");
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&raw).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(raw.join("whatsapp.txt"), "[1/15/2024, 10:30:00] You: hi\n").unwrap();
        fs::write(config_dir.join("timezone_config.json"), "[1, 2]").unwrap();

        let err = Pipeline::new(config_in(dir.path())).run().unwrap_err();
        assert!(matches!(err, TimelineError::InvalidConfig { .. }));
    }
}
