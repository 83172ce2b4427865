//! Instagram JSON export parser.
//!
//! Handles Meta's JSON exports with Mojibake encoding fix.
//!
//! Instagram exports messages as JSON (from "Download Your Data" feature).
//! The main quirk is that Meta exports UTF-8 text encoded as ISO-8859-1,
//! causing Cyrillic and other non-ASCII text to appear as garbage (Mojibake).
//!
//! Entries are emitted in file order; chronological ordering happens later
//! in the pipeline.

use serde::Deserialize;
use serde_json::Value;

use crate::config::{InstagramConfig, Participants};
use crate::error::TimelineError;
use crate::event::Event;
use crate::parser::{ParsedExport, Parser, Platform};
use crate::parsing::instagram::{
    InstagramRawMessage, classify_instagram_message, fix_mojibake_encoding, parse_ms_timestamp,
};

/// Parser for Instagram JSON exports.
///
/// # Example
///
/// ```rust
/// use chat_timeline::config::Participants;
/// use chat_timeline::parser::Parser;
/// use chat_timeline::parsers::InstagramParser;
///
/// let parser = InstagramParser::new(Participants::new("You", "Partner"));
/// let parsed = parser.parse_str(
///     r#"{"messages": [{"sender_name": "You", "timestamp_ms": 1705315800000, "content": "hi"}]}"#,
/// )?;
/// assert_eq!(parsed.events.len(), 1);
/// # Ok::<(), chat_timeline::TimelineError>(())
/// ```
pub struct InstagramParser {
    participants: Participants,
    config: InstagramConfig,
}

impl InstagramParser {
    /// Creates a new parser with default configuration.
    pub fn new(participants: Participants) -> Self {
        Self::with_config(participants, InstagramConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(participants: Participants, config: InstagramConfig) -> Self {
        Self {
            participants,
            config,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &InstagramConfig {
        &self.config
    }

    fn repair(&self, s: String) -> String {
        if self.config.fix_encoding {
            fix_mojibake_encoding(&s)
        } else {
            s
        }
    }

    /// Converts one deserialized entry, or `None` if its timestamp is unusable.
    fn convert(&self, msg: InstagramRawMessage, out: &mut ParsedExport) -> Option<Event> {
        let timestamp = parse_ms_timestamp(msg.timestamp_ms)?;

        let sender = self.repair(msg.sender_name.clone());
        let resolution = self
            .participants
            .resolve(&sender, self.config.sender_fallback);
        if resolution.is_fallback() {
            out.unknown_senders.insert(sender.clone());
        }

        let text = msg.content.clone().map(|c| self.repair(c));
        let classified = classify_instagram_message(&msg, text);

        Some(
            Event::new(
                timestamp,
                resolution.id(),
                Platform::Instagram,
                classified.content,
            )
            .with_kind(classified.kind, classified.media_count),
        )
    }
}

impl Parser for InstagramParser {
    fn name(&self) -> &'static str {
        "Instagram"
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn parse_str(&self, content: &str) -> Result<ParsedExport, TimelineError> {
        let doc: Value =
            serde_json::from_str(content).map_err(|e| TimelineError::instagram_parse(e, None))?;

        let mut out = ParsedExport::new();
        let Some(entries) = doc.get("messages").and_then(Value::as_array) else {
            return Ok(out);
        };

        for entry in entries {
            let event = InstagramRawMessage::deserialize(entry)
                .ok()
                .and_then(|msg| self.convert(msg, &mut out));
            match event {
                Some(event) => out.events.push(event),
                None => out.dropped += 1,
            }
        }

        Ok(out)
    }
}
