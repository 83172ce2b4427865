//! Shared parsing utilities for all platforms.
//!
//! Line patterns, timestamp layouts, raw JSON shapes and classification
//! rules live here so the parsers in [`crate::parsers`] only drive them.

pub mod classify;

#[cfg(feature = "instagram")]
pub mod instagram;

#[cfg(feature = "whatsapp")]
pub mod whatsapp;

// Re-export commonly used items
pub use classify::{KeywordRule, WHATSAPP_RULES, classify, implied_media_count};

#[cfg(feature = "instagram")]
pub use instagram::{
    InstagramRawMessage, classify_instagram_message, fix_mojibake_encoding, parse_ms_timestamp,
};

#[cfg(feature = "whatsapp")]
pub use whatsapp::{HeaderMatcher, LineFormat, parse_whatsapp_timestamp};
