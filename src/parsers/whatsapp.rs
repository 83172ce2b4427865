//! `WhatsApp` TXT export parser.
//!
//! The export is scanned line by line with a two-state machine: either no
//! message is pending, or one message is pending and collecting
//! continuation lines. A header line flushes the pending message and starts
//! a new one; any other line is appended to the pending message with a
//! newline separator.
//!
//! Supported header shapes:
//! - `[1/15/2024, 10:30:45] Sender: Message`
//! - `15/01/2024, 10:30 - Sender: Message`

use crate::config::{Participants, WhatsAppConfig};
use crate::error::TimelineError;
use crate::event::Event;
use crate::parser::{ParsedExport, Parser, Platform};
use crate::parsing::whatsapp::{Header, HeaderMatcher, parse_whatsapp_timestamp};
use crate::parsing::{WHATSAPP_RULES, classify, implied_media_count};

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use chat_timeline::config::Participants;
/// use chat_timeline::parser::Parser;
/// use chat_timeline::parsers::WhatsAppParser;
///
/// let parser = WhatsAppParser::new(Participants::new("You", "Partner"));
/// let parsed = parser.parse_str("[1/15/2024, 10:30:00] Partner: line one\nline two")?;
/// assert_eq!(parsed.events[0].content, "line one\nline two");
/// # Ok::<(), chat_timeline::TimelineError>(())
/// ```
pub struct WhatsAppParser {
    participants: Participants,
    config: WhatsAppConfig,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new(participants: Participants) -> Self {
        Self::with_config(participants, WhatsAppConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(participants: Participants, config: WhatsAppConfig) -> Self {
        Self {
            participants,
            config,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    /// Builds the event for a header, or `None` if its date is unparseable.
    fn start_event(&self, header: &Header<'_>, out: &mut ParsedExport) -> Option<Event> {
        let timestamp = parse_whatsapp_timestamp(header.date, header.time)?;

        let resolution = self
            .participants
            .resolve(header.sender, self.config.sender_fallback);
        if resolution.is_fallback() {
            out.unknown_senders.insert(header.sender.to_string());
        }

        let kind = classify(header.body, WHATSAPP_RULES);
        Some(
            Event::new(timestamp, resolution.id(), Platform::WhatsApp, header.body)
                .with_kind(kind, implied_media_count(kind)),
        )
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn parse_str(&self, content: &str) -> Result<ParsedExport, TimelineError> {
        let matcher =
            HeaderMatcher::new().map_err(|e| TimelineError::whatsapp_parse(e.to_string(), None))?;

        let mut out = ParsedExport::new();
        let mut pending: Option<Event> = None;

        for line in content.lines() {
            if let Some(header) = matcher.header(line) {
                if let Some(done) = pending.take() {
                    out.events.push(done);
                }
                pending = self.start_event(&header, &mut out);
                if pending.is_none() {
                    out.dropped += 1;
                }
            } else if let Some(event) = pending.as_mut() {
                event.content.push('\n');
                event.content.push_str(line.trim());
            } else if !line.trim().is_empty() {
                out.dropped += 1;
            }
        }

        if let Some(done) = pending {
            out.events.push(done);
        }

        Ok(out)
    }
}
