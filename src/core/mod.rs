//! Core processing stages.
//!
//! This module contains:
//! - [`timezone`] - local hour-of-day normalization
//! - [`latency`] - chronological ordering and reply latency
//! - [`stats`] - summary statistics
//! - [`output`] - JSON export of the dataset, year partitions and statistics
//!
//! Each stage takes the event collection by value and hands it back, so
//! exactly one stage owns it at a time.
//!
//! # Quick Start
//!
//! ```rust
//! use chat_timeline::core::{SummaryStats, compute_reply_latency, normalize_timezone};
//! use chat_timeline::event::Event;
//! use chat_timeline::parser::Platform;
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let events = vec![
//!     Event::new(day.and_hms_opt(10, 1, 0).unwrap(), "Partner", Platform::Instagram, "hey"),
//!     Event::new(day.and_hms_opt(10, 0, 0).unwrap(), "You", Platform::WhatsApp, "hi"),
//! ];
//!
//! let events = normalize_timezone(events, None);
//! let events = compute_reply_latency(events);
//! assert_eq!(events[1].reply_latency_seconds, Some(60.0));
//!
//! let stats = SummaryStats::from_events(&events)?;
//! assert_eq!(stats.total_messages, 2);
//! # Ok::<(), chat_timeline::TimelineError>(())
//! ```

pub mod latency;
pub mod output;
pub mod stats;
pub mod timezone;

// Re-export main items for convenience
pub use latency::compute_reply_latency;
pub use output::{ExportReport, WrittenFile, export_events, export_summary};
pub use stats::{DateRange, SummaryStats};
pub use timezone::normalize_timezone;
