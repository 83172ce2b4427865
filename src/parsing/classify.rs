//! Ordered keyword rules for classifying message bodies.
//!
//! Rules are evaluated top to bottom and the first rule with a matching
//! marker decides the [`EventKind`]; a body matching no rule is text.
//! Matching is a case-insensitive substring test.

use crate::event::EventKind;

/// One classification rule: any of `markers` found in the body yields `kind`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub kind: EventKind,
    /// Lowercase substrings
    pub markers: &'static [&'static str],
}

impl KeywordRule {
    /// Returns `true` if the (already lowercased) body contains any marker.
    pub fn matches(&self, body_lower: &str) -> bool {
        self.markers.iter().any(|m| body_lower.contains(m))
    }
}

/// WhatsApp placeholders, in priority order.
pub const WHATSAPP_RULES: &[KeywordRule] = &[
    KeywordRule {
        kind: EventKind::Image,
        markers: &["<media omitted>", "image omitted"],
    },
    KeywordRule {
        kind: EventKind::Voice,
        markers: &["audio omitted", "voice message"],
    },
    KeywordRule {
        kind: EventKind::Video,
        markers: &["video omitted"],
    },
    KeywordRule {
        kind: EventKind::Call,
        markers: &["missed voice call", "missed video call"],
    },
];

/// Returns the kind of the first rule matching `body`, or [`EventKind::Text`].
pub fn classify(body: &str, rules: &[KeywordRule]) -> EventKind {
    let lower = body.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lower))
        .map_or(EventKind::Text, |rule| rule.kind)
}

/// Media count implied by a keyword-classified kind.
///
/// Exports only carry a single placeholder per message, so image and video
/// count as one item.
pub fn implied_media_count(kind: EventKind) -> u32 {
    u32::from(kind.is_media())
}
