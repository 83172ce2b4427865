//! Unified parser trait for chat exports.
//!
//! Every source platform has one parser. A parser turns one export file
//! into a [`ParsedExport`]: the events it could build, plus a count of the
//! records it had to drop and the sender names it could not attribute.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "whatsapp")]
//! # fn main() -> chat_timeline::Result<()> {
//! use chat_timeline::config::{Participants, PipelineConfig};
//! use chat_timeline::parser::{Platform, create_parser};
//!
//! let config = PipelineConfig::new().with_participants(Participants::new("You", "Partner"));
//! let parser = create_parser(Platform::WhatsApp, &config).expect("whatsapp feature enabled");
//! let parsed = parser.parse_str("[1/15/2024, 10:30:00] Partner: hi")?;
//!
//! assert_eq!(parsed.events.len(), 1);
//! assert_eq!(parsed.events[0].sender_id, "Partner");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "whatsapp"))]
//! # fn main() {}
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Event;
use crate::config::PipelineConfig;
use crate::error::TimelineError;

/// Supported messaging platforms.
///
/// Serialized in lowercase (`"whatsapp"`, `"instagram"`), which is also the
/// form used for the `platform` field of every exported [`Event`].
///
/// # Example
///
/// ```rust
/// use chat_timeline::parser::Platform;
///
/// assert_eq!(Platform::WhatsApp.as_str(), "whatsapp");
/// assert_eq!(Platform::Instagram.to_string(), "Instagram");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// WhatsApp TXT exports (bracketed and dash-separated line formats)
    WhatsApp,

    /// Instagram JSON exports from data download
    Instagram,
}

impl Platform {
    /// Returns the serialized identifier of this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WhatsApp => "whatsapp",
            Platform::Instagram => "instagram",
        }
    }

    /// Returns all available platforms.
    pub fn all() -> &'static [Platform] {
        &[Platform::WhatsApp, Platform::Instagram]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Instagram => write!(f, "Instagram"),
        }
    }
}

/// The result of parsing one export file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedExport {
    /// Events in source order.
    pub events: Vec<Event>,

    /// Records (lines or message objects) that could not become events.
    pub dropped: usize,

    /// Sender names that matched neither participant and were attributed
    /// through the platform's fallback rule.
    pub unknown_senders: BTreeSet<String>,
}

impl ParsedExport {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no events were produced.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Unified trait for parsing chat exports into timeline events.
///
/// Implementations only need [`parse_str`](Parser::parse_str); the default
/// [`parse`](Parser::parse) reads the file as UTF-8 and delegates.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the platform this parser handles.
    fn platform(&self) -> Platform;

    /// Parses export content already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Parse`] only when the document as a whole is
    /// unusable. Individual bad records are dropped and counted.
    fn parse_str(&self, content: &str) -> Result<ParsedExport, TimelineError>;

    /// Parses an export file.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Io`] if the file cannot be read, or whatever
    /// [`parse_str`](Parser::parse_str) returns, with the path attached.
    fn parse(&self, path: &Path) -> Result<ParsedExport, TimelineError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content).map_err(|e| e.with_path(path))
    }
}

/// Creates the parser for `platform`, configured from `config`.
///
/// Returns `None` if the parser feature for `platform` is not enabled.
pub fn create_parser(platform: Platform, config: &PipelineConfig) -> Option<Box<dyn Parser>> {
    match platform {
        #[cfg(feature = "whatsapp")]
        Platform::WhatsApp => Some(Box::new(crate::parsers::WhatsAppParser::with_config(
            config.participants.clone(),
            config.whatsapp.clone(),
        ))),
        #[cfg(feature = "instagram")]
        Platform::Instagram => Some(Box::new(crate::parsers::InstagramParser::with_config(
            config.participants.clone(),
            config.instagram.clone(),
        ))),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serde() {
        assert_eq!(
            serde_json::to_string(&Platform::WhatsApp).unwrap(),
            "\"whatsapp\""
        );
        let parsed: Platform = serde_json::from_str("\"instagram\"").unwrap();
        assert_eq!(parsed, Platform::Instagram);
        assert!(serde_json::from_str::<Platform>("\"ig\"").is_err());
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::WhatsApp.to_string(), "WhatsApp");
        assert_eq!(Platform::Instagram.to_string(), "Instagram");
        assert_eq!(Platform::Instagram.as_str(), "instagram");
        assert_eq!(Platform::all().len(), 2);
    }

    #[cfg(all(feature = "whatsapp", feature = "instagram"))]
    #[test]
    fn test_create_parser() {
        let config = PipelineConfig::new();
        for &platform in Platform::all() {
            let parser = create_parser(platform, &config).unwrap();
            assert_eq!(parser.platform(), platform);
            assert_eq!(parser.name(), platform.to_string());
        }
    }

    #[cfg(feature = "whatsapp")]
    #[test]
    fn test_parse_missing_file_is_not_found() {
        let parser = create_parser(Platform::WhatsApp, &PipelineConfig::new()).unwrap();
        let err = parser
            .parse(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
