//! Unified error types for chat-timeline.
//!
//! This module provides a single [`TimelineError`] enum that covers every
//! fatal condition in the pipeline. Non-fatal conditions (a missing export
//! file, an unparseable line, a sender that matches neither participant)
//! are never errors: they show up as counters on
//! [`ParsedExport`](crate::parser::ParsedExport) and as `tracing` events.
//!
//! # Error Taxonomy
//!
//! | Condition | Variant | Fatal for |
//! |-----------|---------|-----------|
//! | Export file unreadable | [`Io`](TimelineError::Io) | that source only |
//! | Export document malformed | [`Parse`](TimelineError::Parse) | that source only |
//! | Bad timezone config | [`InvalidConfig`](TimelineError::InvalidConfig) | the run |
//! | Nothing parsed | [`EmptyDataset`](TimelineError::EmptyDataset) | the run |
//! | Output not writable | [`Write`](TimelineError::Write) | that artifact |

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chat-timeline operations.
///
/// # Example
///
/// ```rust
/// use chat_timeline::error::Result;
/// use chat_timeline::Event;
///
/// fn my_function() -> Result<Vec<Event>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, TimelineError>;

/// The error type for all chat-timeline operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimelineError {
    /// An I/O error occurred while reading an input.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse an export document as a whole.
    ///
    /// Individual records that fail to parse are dropped and counted
    /// instead; this variant is for documents that cannot be read at all.
    #[error("Failed to parse {format} export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "Instagram JSON", "WhatsApp TXT")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The timezone configuration exists but cannot be used.
    #[error("Invalid configuration in {}: {message}", path.display())]
    InvalidConfig {
        /// Path of the configuration file
        path: PathBuf,
        /// Description of what's wrong
        message: String,
    },

    /// No events were parsed from any source.
    #[error("No events parsed from any source; nothing to normalize or export")]
    EmptyDataset,

    /// An output artifact could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Target path of the artifact
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Regex/pattern matching error
    #[error("{0}")]
    Pattern(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TimelineError {
    /// Creates a parse error for WhatsApp format.
    pub fn whatsapp_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        TimelineError::Parse {
            format: "WhatsApp TXT",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates a parse error for Instagram format.
    pub fn instagram_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        TimelineError::Parse {
            format: "Instagram JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        TimelineError::InvalidConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a write error for an output artifact.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TimelineError::Write {
            path: path.into(),
            source,
        }
    }

    /// Attaches a file path to a parse error that was produced from a string.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            TimelineError::Parse {
                format,
                source,
                path: None,
            } => TimelineError::Parse {
                format,
                source,
                path: Some(file.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, TimelineError::Parse { .. })
    }

    /// Returns `true` if this is an empty-dataset error.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, TimelineError::EmptyDataset)
    }

    /// Returns `true` if this is an output write error.
    pub fn is_write(&self) -> bool {
        matches!(self, TimelineError::Write { .. })
    }

    /// Returns `true` if the input file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TimelineError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}
