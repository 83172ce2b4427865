//! Summary statistics over the final event sequence.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::event::{Event, iso_seconds};

/// First and last timestamp of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "iso_seconds")]
    pub start: NaiveDateTime,
    #[serde(with = "iso_seconds")]
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Whole days between `start` and `end`, floored at one.
    ///
    /// A dataset spanning less than a day counts as one day, so the per-day
    /// average is always finite.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

/// Aggregate counts written to `summary_stats.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_messages: usize,
    pub date_range: DateRange,
    pub by_platform: BTreeMap<String, usize>,
    pub by_sender: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub messages_per_day: f64,
}

impl SummaryStats {
    /// Computes statistics in a single pass.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::EmptyDataset`] if `events` is empty.
    pub fn from_events(events: &[Event]) -> Result<Self> {
        let first = events.first().ok_or(TimelineError::EmptyDataset)?;
        let mut range = DateRange {
            start: first.timestamp,
            end: first.timestamp,
        };

        let mut by_platform = BTreeMap::new();
        let mut by_sender = BTreeMap::new();
        let mut by_type = BTreeMap::new();

        for event in events {
            range.start = range.start.min(event.timestamp);
            range.end = range.end.max(event.timestamp);
            *by_platform
                .entry(event.platform.as_str().to_string())
                .or_insert(0) += 1;
            *by_sender.entry(event.sender_id.clone()).or_insert(0) += 1;
            *by_type.entry(event.kind.as_str().to_string()).or_insert(0) += 1;
        }

        let total_messages = events.len();
        Ok(Self {
            total_messages,
            date_range: range,
            by_platform,
            by_sender,
            by_type,
            messages_per_day: total_messages as f64 / range.span_days() as f64,
        })
    }
}
