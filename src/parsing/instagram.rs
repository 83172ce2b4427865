//! Shared Instagram parsing utilities.
//!
//! Instagram ("Download Your Data") exports are JSON documents with a
//! top-level `messages` array. Each message has `sender_name`,
//! `timestamp_ms` and at most one of `photos`, `videos`, `audio_files` or a
//! plain `content` string.

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::event::EventKind;

/// Raw Instagram message structure for deserialization.
#[derive(Debug, Deserialize)]
pub struct InstagramRawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<IgnoredAny>>,
    #[serde(default)]
    pub videos: Option<Vec<IgnoredAny>>,
    #[serde(default)]
    pub audio_files: Option<Vec<IgnoredAny>>,
}

/// Kind, media count and content decided for one raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: EventKind,
    pub media_count: u32,
    pub content: String,
}

/// One presence rule: if `items` finds a collection, the message is `kind`.
struct MediaRule {
    kind: EventKind,
    items: fn(&InstagramRawMessage) -> Option<usize>,
    placeholder: fn(usize) -> String,
    counts_media: bool,
}

/// Attachment collections in priority order.
const MEDIA_RULES: [MediaRule; 3] = [
    MediaRule {
        kind: EventKind::Image,
        items: |m| m.photos.as_ref().map(Vec::len),
        placeholder: |n| format!("[{n} photo(s)]"),
        counts_media: true,
    },
    MediaRule {
        kind: EventKind::Video,
        items: |m| m.videos.as_ref().map(Vec::len),
        placeholder: |n| format!("[{n} video(s)]"),
        counts_media: true,
    },
    MediaRule {
        kind: EventKind::Voice,
        items: |m| m.audio_files.as_ref().map(Vec::len),
        placeholder: |_| "[Voice message]".to_string(),
        counts_media: false,
    },
];

/// Classifies a raw message by which attachment collection is present.
///
/// `content` is the (possibly encoding-fixed) text to use for plain text
/// messages; an absent text becomes the empty string.
pub fn classify_instagram_message(msg: &InstagramRawMessage, content: Option<String>) -> Classified {
    for rule in &MEDIA_RULES {
        if let Some(n) = (rule.items)(msg) {
            return Classified {
                kind: rule.kind,
                media_count: if rule.counts_media { n as u32 } else { 0 },
                content: (rule.placeholder)(n),
            };
        }
    }

    Classified {
        kind: EventKind::Text,
        media_count: 0,
        content: content.unwrap_or_default(),
    }
}

/// Fix Meta's broken encoding (Mojibake).
///
/// Meta exports UTF-8 text encoded as if it were ISO-8859-1: each UTF-8
/// byte is stored as a separate codepoint, so "Привет" becomes
/// "ÐŸÑ€Ð¸Ð²ÐµÑ‚". Reversing that means reading every char back as a byte.
/// Text that cannot be the product of that process is returned unchanged.
pub fn fix_mojibake_encoding(s: &str) -> String {
    if s.is_ascii() || s.chars().any(|c| u32::from(c) > 0xFF) {
        return s.to_string();
    }
    let bytes: Vec<u8> = s.chars().map(|c| u32::from(c) as u8).collect();
    String::from_utf8(bytes).unwrap_or_else(|_| s.to_string())
}

/// Converts a millisecond epoch value to naive local time.
pub fn parse_ms_timestamp(timestamp_ms: i64) -> Option<NaiveDateTime> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> InstagramRawMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_fix_encoding_ascii() {
        assert_eq!(fix_mojibake_encoding("Hello"), "Hello");
        assert_eq!(fix_mojibake_encoding("Test 123"), "Test 123");
    }

    #[test]
    fn test_fix_encoding_repairs_mojibake() {
        let broken: String = "Привет".bytes().map(char::from).collect();
        assert_eq!(fix_mojibake_encoding(&broken), "Привет");
    }

    #[test]
    fn test_fix_encoding_leaves_real_unicode_alone() {
        assert_eq!(fix_mojibake_encoding("Привет"), "Привет");
        assert_eq!(fix_mojibake_encoding("café"), "café");
    }

    #[test]
    fn test_parse_ms_timestamp() {
        let expected = Local
            .timestamp_opt(1705315800, 0)
            .single()
            .unwrap()
            .naive_local();
        assert_eq!(parse_ms_timestamp(1705315800000), Some(expected));
    }

    #[test]
    fn test_classify_photos() {
        let msg = raw(
            r#"{"sender_name": "a", "timestamp_ms": 1, "content": "ignored",
                "photos": [{"uri": "1.jpg"}, {"uri": "2.jpg"}, {"uri": "3.jpg"}]}"#,
        );
        let c = classify_instagram_message(&msg, msg.content.clone());
        assert_eq!(c.kind, EventKind::Image);
        assert_eq!(c.media_count, 3);
        assert_eq!(c.content, "[3 photo(s)]");
    }

    #[test]
    fn test_classify_photos_before_videos() {
        let msg = raw(
            r#"{"sender_name": "a", "timestamp_ms": 1,
                "photos": [{"uri": "1.jpg"}], "videos": [{"uri": "1.mp4"}]}"#,
        );
        assert_eq!(classify_instagram_message(&msg, None).kind, EventKind::Image);
    }

    #[test]
    fn test_classify_videos_and_audio() {
        let msg = raw(r#"{"sender_name": "a", "timestamp_ms": 1, "videos": [{}, {}]}"#);
        let c = classify_instagram_message(&msg, None);
        assert_eq!((c.kind, c.media_count), (EventKind::Video, 2));
        assert_eq!(c.content, "[2 video(s)]");

        let msg = raw(r#"{"sender_name": "a", "timestamp_ms": 1, "audio_files": [{}]}"#);
        let c = classify_instagram_message(&msg, None);
        assert_eq!((c.kind, c.media_count), (EventKind::Voice, 0));
        assert_eq!(c.content, "[Voice message]");
    }

    #[test]
    fn test_classify_text_defaults_to_empty() {
        let msg = raw(r#"{"sender_name": "a", "timestamp_ms": 1}"#);
        let c = classify_instagram_message(&msg, None);
        assert_eq!(c.kind, EventKind::Text);
        assert_eq!(c.content, "");
    }
}
