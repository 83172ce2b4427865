//! Unified timeline event for all chat platforms.
//!
//! This module provides [`Event`], the normalized representation every
//! parser produces and every downstream stage consumes. An event is created
//! once from one source record, gains `hour_of_day_local` in the timezone
//! stage and `reply_latency_seconds` in the latency stage, and is only read,
//! reordered and serialized after that.
//!
//! # Examples
//!
//! ```
//! use chat_timeline::event::{Event, EventKind};
//! use chat_timeline::parser::Platform;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
//!     .unwrap()
//!     .and_hms_opt(10, 30, 0)
//!     .unwrap();
//!
//! let event = Event::new(ts, "You", Platform::WhatsApp, "Hello!");
//! assert_eq!(event.kind, EventKind::Text);
//! assert_eq!(event.media_count, 0);
//!
//! let json = serde_json::to_string(&event)?;
//! assert!(json.contains(r#""timestamp":"2024-01-15T10:30:00""#));
//! assert!(json.contains(r#""type":"text""#));
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::parser::Platform;

/// Category of an event, derived from its content.
///
/// Serialized in lowercase as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Plain text message
    Text,
    /// One or more photos
    Image,
    /// One or more videos
    Video,
    /// Voice note or audio file
    #[serde(alias = "audio")]
    Voice,
    /// Voice or video call (including missed calls)
    Call,
}

impl EventKind {
    /// Returns the serialized identifier of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Text => "text",
            EventKind::Image => "image",
            EventKind::Video => "video",
            EventKind::Voice => "voice",
            EventKind::Call => "call",
        }
    }

    /// Returns `true` for kinds that carry attached media items.
    pub fn is_media(&self) -> bool {
        matches!(self, EventKind::Image | EventKind::Video)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized message or call record from either platform.
///
/// # Serialization
///
/// - `timestamp` is a second-precision ISO-8601 string without offset
///   (`2024-01-15T10:30:00`)
/// - `kind` is written as `type`
/// - `hour_of_day_local` is omitted until the timezone stage sets it
/// - `call_duration_seconds` and `reply_latency_seconds` are written as
///   `null` when unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Naive local time the record was sent.
    #[serde(with = "iso_seconds")]
    pub timestamp: NaiveDateTime,

    /// Identifier of one of the two configured participants.
    pub sender_id: String,

    /// Source platform.
    pub platform: Platform,

    /// Content category.
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Message text, or a placeholder for media.
    pub content: String,

    /// Number of attached media items; zero for text, voice and call.
    pub media_count: u32,

    /// Call length, only ever set for [`EventKind::Call`].
    #[serde(default)]
    pub call_duration_seconds: Option<u64>,

    /// Local hour (0-23), set by the timezone stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_of_day_local: Option<u32>,

    /// Seconds since the previous event from the other participant.
    #[serde(default)]
    pub reply_latency_seconds: Option<f64>,
}

impl Event {
    /// Creates a text event with no derived fields.
    pub fn new(
        timestamp: NaiveDateTime,
        sender_id: impl Into<String>,
        platform: Platform,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            sender_id: sender_id.into(),
            platform,
            kind: EventKind::Text,
            content: content.into(),
            media_count: 0,
            call_duration_seconds: None,
            hour_of_day_local: None,
            reply_latency_seconds: None,
        }
    }

    /// Builder method to set the kind and media count together.
    #[must_use]
    pub fn with_kind(mut self, kind: EventKind, media_count: u32) -> Self {
        self.kind = kind;
        self.media_count = media_count;
        self
    }

    /// Calendar year of the timestamp, the partitioning key for export.
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }
}

/// Sorts events by timestamp, keeping the relative order of equal timestamps.
pub fn sort_chronologically(events: &mut [Event]) {
    events.sort_by_key(|e| e.timestamp);
}

/// Second-precision ISO-8601 (de)serialization for naive timestamps.
pub mod iso_seconds {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format used for every timestamp in exported files.
    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
