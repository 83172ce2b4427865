//! Configuration types for parsers and the pipeline.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`Participants`] - the two identities of the conversation
//! - [`WhatsAppConfig`] / [`InstagramConfig`] - per-parser settings
//! - [`TimezoneConfig`] - optional hour-of-day normalization settings
//! - [`PipelineConfig`] - input/output locations for a full run
//!
//! # Example
//!
//! ```rust
//! use chat_timeline::config::{Participant, Participants, PipelineConfig};
//!
//! let participants = Participants::new("You", "Partner")
//!     .with_first(Participant::new("You").with_alias("Alice Smith"))
//!     .with_second(Participant::new("Partner").with_alias("bob_insta"));
//!
//! let config = PipelineConfig::new()
//!     .with_output_dir("public/data")
//!     .with_participants(participants);
//!
//! assert_eq!(config.participants.resolve("bob_insta", chat_timeline::config::Side::First).id(), "Partner");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TimelineError};
use crate::parser::Platform;

/// File name of the timezone configuration inside the config directory.
pub const TIMEZONE_CONFIG_FILE: &str = "timezone_config.json";

// ============================================================================
// Participants
// ============================================================================

/// Which of the two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    First,
    Second,
}

/// One identity of the two-party conversation.
///
/// `id` is what gets written to `sender_id`. Export files usually carry
/// display names instead, so any number of exact-match aliases can be
/// attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier written to every event sent by this participant.
    pub id: String,

    /// Additional exact names that resolve to this participant.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Participant {
    /// Creates a participant whose only recognized name is its id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aliases: Vec::new(),
        }
    }

    /// Adds an exact-match alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Returns `true` if `name` is this participant's id or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.id == name || self.aliases.iter().any(|a| a == name)
    }
}

/// How a raw sender name was attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The name matched a participant exactly.
    Matched(&'a str),
    /// The name matched neither participant; the fallback side was used.
    Fallback(&'a str),
}

impl<'a> Resolution<'a> {
    /// The participant id the sender resolved to.
    pub fn id(&self) -> &'a str {
        match *self {
            Resolution::Matched(id) | Resolution::Fallback(id) => id,
        }
    }

    /// Returns `true` if the fallback rule was applied.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

/// The closed set of two conversation participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub first: Participant,
    pub second: Participant,
}

impl Default for Participants {
    fn default() -> Self {
        Self::new("You", "Partner")
    }
}

impl Participants {
    /// Creates participants identified by `first` and `second` with no aliases.
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: Participant::new(first),
            second: Participant::new(second),
        }
    }

    /// Replaces the first participant.
    #[must_use]
    pub fn with_first(mut self, participant: Participant) -> Self {
        self.first = participant;
        self
    }

    /// Replaces the second participant.
    #[must_use]
    pub fn with_second(mut self, participant: Participant) -> Self {
        self.second = participant;
        self
    }

    /// Returns the participant on `side`.
    pub fn get(&self, side: Side) -> &Participant {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Returns both participant ids.
    pub fn ids(&self) -> [&str; 2] {
        [self.first.id.as_str(), self.second.id.as_str()]
    }

    /// Resolves a raw sender name to a participant.
    ///
    /// Exact match on the first participant wins, then exact match on the
    /// second. A name matching neither is attributed to `fallback` and
    /// reported as [`Resolution::Fallback`].
    pub fn resolve(&self, name: &str, fallback: Side) -> Resolution<'_> {
        if self.first.matches(name) {
            Resolution::Matched(self.first.id.as_str())
        } else if self.second.matches(name) {
            Resolution::Matched(self.second.id.as_str())
        } else {
            Resolution::Fallback(self.get(fallback).id.as_str())
        }
    }
}

// ============================================================================
// Parser configurations
// ============================================================================

/// Configuration for WhatsApp export parsing.
///
/// # Example
///
/// ```rust
/// use chat_timeline::config::{Side, WhatsAppConfig};
///
/// let config = WhatsAppConfig::new().with_sender_fallback(Side::Second);
/// assert_eq!(config.sender_fallback, Side::Second);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Participant that receives senders matching neither name (default: first)
    pub sender_fallback: Side,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            sender_fallback: Side::First,
        }
    }
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback side for unknown senders.
    #[must_use]
    pub fn with_sender_fallback(mut self, side: Side) -> Self {
        self.sender_fallback = side;
        self
    }
}

/// Configuration for Instagram export parsing.
///
/// Instagram exports are JSON files with Mojibake encoding issues.
/// The parser fixes the encoding unless told otherwise.
///
/// # Example
///
/// ```rust
/// use chat_timeline::config::InstagramConfig;
///
/// let config = InstagramConfig::new().with_fix_encoding(false);
/// assert!(!config.fix_encoding);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Fix Meta's broken UTF-8 encoding (Mojibake) (default: true)
    pub fix_encoding: bool,

    /// Participant that receives senders matching neither name (default: second)
    pub sender_fallback: Side,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            fix_encoding: true,
            sender_fallback: Side::Second,
        }
    }
}

impl InstagramConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables encoding fix.
    #[must_use]
    pub fn with_fix_encoding(mut self, fix: bool) -> Self {
        self.fix_encoding = fix;
        self
    }

    /// Sets the fallback side for unknown senders.
    #[must_use]
    pub fn with_sender_fallback(mut self, side: Side) -> Self {
        self.sender_fallback = side;
        self
    }
}

// ============================================================================
// Timezone configuration
// ============================================================================

/// Optional timezone settings, loaded once per run.
///
/// The document is opaque apart from `platform_offsets_minutes`, which maps
/// a platform name (`"whatsapp"`, `"instagram"`) to a number of minutes to
/// add before the local hour is taken. Without offsets the hour is read
/// straight from the stored timestamp. Other keys are kept but ignored.
///
/// An offsets value that is not an object of integers is ignored with a
/// warning. An empty document (`{}`) counts as no configuration at all.
///
/// ```json
/// { "platform_offsets_minutes": { "instagram": -120 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimezoneConfig {
    #[serde(default, deserialize_with = "lenient_offsets")]
    pub platform_offsets_minutes: BTreeMap<String, i32>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TimezoneConfig {
    /// Creates an empty (identity) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hour offset for one platform.
    #[must_use]
    pub fn with_offset(mut self, platform: Platform, minutes: i32) -> Self {
        self.platform_offsets_minutes
            .insert(platform.as_str().to_string(), minutes);
        self
    }

    /// Minutes to add to `platform` timestamps before extracting the hour.
    pub fn offset_minutes(&self, platform: Platform) -> i32 {
        self.platform_offsets_minutes
            .get(platform.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Parses a configuration document.
    ///
    /// Returns `Ok(None)` for an empty object.
    pub fn from_json(content: &str) -> serde_json::Result<Option<Self>> {
        let doc: serde_json::Value = serde_json::from_str(content)?;
        if doc.as_object().is_some_and(serde_json::Map::is_empty) {
            return Ok(None);
        }
        serde_json::from_value(doc).map(Some)
    }

    /// Loads the configuration from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist or holds `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidConfig`] if the file exists but cannot
    /// be read or is not a JSON object of the expected shape.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TimelineError::invalid_config(path, e.to_string())),
        };

        let config = Self::from_json(&content)
            .map_err(|e| TimelineError::invalid_config(path, e.to_string()))?;
        if config.is_none() {
            info!(path = %path.display(), "Timezone config is empty");
        }
        Ok(config)
    }
}

/// Keeps the integer entries of `platform_offsets_minutes`, warning about
/// anything else instead of rejecting the document.
fn lenient_offsets<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        warn!(value = %value, "platform_offsets_minutes is not an object, ignoring it");
        return Ok(BTreeMap::new());
    };

    let mut offsets = BTreeMap::new();
    for (platform, minutes) in entries {
        match minutes.as_i64().and_then(|m| i32::try_from(m).ok()) {
            Some(m) => {
                offsets.insert(platform, m);
            }
            None => warn!(platform = %platform, value = %minutes, "Ignoring non-integer timezone offset"),
        }
    }
    Ok(offsets)
}

// ============================================================================
// Pipeline configuration
// ============================================================================

/// Locations and settings for one full pipeline run.
///
/// Relative input file names are resolved against `source_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding raw exports (default: `data/raw`)
    pub source_dir: PathBuf,

    /// Directory receiving processed files (default: `data/processed`)
    pub output_dir: PathBuf,

    /// Directory holding `timezone_config.json` (default: `config`)
    pub config_dir: PathBuf,

    /// WhatsApp export files (default: `whatsapp.txt`)
    pub whatsapp_files: Vec<PathBuf>,

    /// Instagram export files (default: `instagram_message_1.json`)
    pub instagram_files: Vec<PathBuf>,

    pub participants: Participants,
    pub whatsapp: WhatsAppConfig,
    pub instagram: InstagramConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/processed"),
            config_dir: PathBuf::from("config"),
            whatsapp_files: vec![PathBuf::from("whatsapp.txt")],
            instagram_files: vec![PathBuf::from("instagram_message_1.json")],
            participants: Participants::default(),
            whatsapp: WhatsAppConfig::default(),
            instagram: InstagramConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Replaces the WhatsApp input list.
    #[must_use]
    pub fn with_whatsapp_files(mut self, files: Vec<PathBuf>) -> Self {
        self.whatsapp_files = files;
        self
    }

    /// Replaces the Instagram input list.
    #[must_use]
    pub fn with_instagram_files(mut self, files: Vec<PathBuf>) -> Self {
        self.instagram_files = files;
        self
    }

    #[must_use]
    pub fn with_participants(mut self, participants: Participants) -> Self {
        self.participants = participants;
        self
    }

    #[must_use]
    pub fn with_whatsapp_config(mut self, config: WhatsAppConfig) -> Self {
        self.whatsapp = config;
        self
    }

    #[must_use]
    pub fn with_instagram_config(mut self, config: InstagramConfig) -> Self {
        self.instagram = config;
        self
    }

    /// Resolves an input file name against the source directory.
    pub fn resolve_input(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.source_dir.join(file)
        }
    }

    /// Input files for `platform`, resolved against the source directory.
    pub fn inputs(&self, platform: Platform) -> Vec<PathBuf> {
        let files = match platform {
            Platform::WhatsApp => &self.whatsapp_files,
            Platform::Instagram => &self.instagram_files,
        };
        files.iter().map(|f| self.resolve_input(f)).collect()
    }

    /// Path of the timezone configuration file.
    pub fn timezone_config_path(&self) -> PathBuf {
        self.config_dir.join(TIMEZONE_CONFIG_FILE)
    }
}
