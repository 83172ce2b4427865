//! # chat-timeline
//!
//! Merge two-party chat exports from WhatsApp and Instagram into a single,
//! time-ordered, schema-normalized event stream.
//!
//! ## Overview
//!
//! - **WhatsApp** - TXT exports (bracketed and dash-separated line formats)
//! - **Instagram** - JSON exports from Instagram data download
//!
//! Every record becomes an [`Event`]. The pipeline then fills in the local
//! hour of day, sorts everything chronologically, computes how long each
//! reply took, and writes the dataset as JSON: one full file, one file per
//! calendar year and a summary statistics object.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chat_timeline::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = PipelineConfig::new()
//!         .with_source_dir("exports")
//!         .with_output_dir("public/data")
//!         .with_participants(Participants::new("me", "them"));
//!
//!     let report = Pipeline::new(config).run()?;
//!     println!("{} events, {:.1} per day", report.events, report.stats.messages_per_day);
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing a Single Export
//!
//! ```rust
//! use chat_timeline::config::{Participants, PipelineConfig};
//! use chat_timeline::parser::{Platform, create_parser};
//!
//! let config = PipelineConfig::new().with_participants(Participants::new("You", "Partner"));
//! let parser = create_parser(Platform::WhatsApp, &config).expect("whatsapp feature enabled");
//! let parsed = parser.parse_str("15/01/2024, 10:30 - Partner: <Media omitted>")?;
//! assert_eq!(parsed.events[0].media_count, 1);
//! # Ok::<(), chat_timeline::TimelineError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`event`] - [`Event`], [`EventKind`](event::EventKind)
//! - [`parser`] - [`Parser`](parser::Parser) trait, [`Platform`](parser::Platform)
//! - [`parsers`] - [`WhatsAppParser`](parsers::WhatsAppParser), [`InstagramParser`](parsers::InstagramParser)
//! - [`parsing`] - shared line patterns, timestamp layouts and classification rules
//! - [`core`] - timezone, latency, statistics and output stages
//! - [`pipeline`] - end-to-end driver and run reports
//! - [`config`] - participants, parser and pipeline configuration
//! - [`error`] - [`TimelineError`], [`Result`]
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod event;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod pipeline;

// Re-export the main types at the crate root for convenience
pub use error::{Result, TimelineError};
pub use event::Event;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chat_timeline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::event::{Event, EventKind};

    pub use crate::error::{Result, TimelineError};

    pub use crate::parser::{ParsedExport, Parser, Platform, create_parser};

    pub use crate::config::{
        InstagramConfig, Participant, Participants, PipelineConfig, Side, TimezoneConfig,
        WhatsAppConfig,
    };

    pub use crate::core::{
        ExportReport, SummaryStats, compute_reply_latency, export_events, export_summary,
        normalize_timezone,
    };

    pub use crate::pipeline::{Pipeline, RunReport, SourceReport, SourceStatus};

    #[cfg(feature = "instagram")]
    pub use crate::parsers::InstagramParser;
    #[cfg(feature = "whatsapp")]
    pub use crate::parsers::WhatsAppParser;
}
