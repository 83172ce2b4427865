//! Shared WhatsApp parsing utilities.
//!
//! WhatsApp exports put one message header per line in one of two shapes:
//!
//! - Bracketed: `[15/01/2024, 10:30:45] Sender: Message`
//! - Dashed: `15/01/2024, 10:30 - Sender: Message`
//!
//! Any other line continues the message above it.

use chrono::NaiveDateTime;
use regex::Regex;

/// Accepted header line shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// `[date, time] Sender: Message`
    Bracketed,
    /// `date, time - Sender: Message`
    Dashed,
}

impl LineFormat {
    /// Returns the regex pattern for this line shape.
    ///
    /// Captures: 1 = date, 2 = time, 3 = sender, 4 = message body.
    pub fn pattern(self) -> &'static str {
        match self {
            LineFormat::Bracketed => {
                r"^\[(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)$"
            }
            LineFormat::Dashed => {
                r"^(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)$"
            }
        }
    }

    /// Returns all line shapes in match priority order.
    pub fn all() -> &'static [LineFormat] {
        &[LineFormat::Bracketed, LineFormat::Dashed]
    }
}

/// A matched message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub format: LineFormat,
    pub date: &'a str,
    pub time: &'a str,
    pub sender: &'a str,
    pub body: &'a str,
}

/// Compiled header patterns, tried in [`LineFormat::all`] order.
pub struct HeaderMatcher {
    patterns: Vec<(LineFormat, Regex)>,
}

impl HeaderMatcher {
    /// Compiles every header pattern.
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = LineFormat::all()
            .iter()
            .map(|&format| Regex::new(format.pattern()).map(|re| (format, re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Matches `line` against the header shapes.
    ///
    /// A leading left-to-right mark (prepended by some iOS exports) is ignored.
    pub fn header<'a>(&self, line: &'a str) -> Option<Header<'a>> {
        let line = line.trim_start_matches('\u{200e}');
        self.patterns.iter().find_map(|(format, re)| {
            let caps = re.captures(line)?;
            Some(Header {
                format: *format,
                date: caps.get(1)?.as_str(),
                time: caps.get(2)?.as_str(),
                sender: caps.get(3)?.as_str().trim(),
                body: caps.get(4).map_or("", |m| m.as_str()),
            })
        })
    }
}

/// Date/time layouts in priority order. `{Y}` is replaced with the year
/// directive matching the year token's width.
const TIMESTAMP_LAYOUTS: [&str; 4] = [
    "%m/%d/{Y} %H:%M:%S",
    "%d/%m/{Y} %H:%M:%S",
    "%m/%d/{Y} %H:%M",
    "%d/%m/{Y} %H:%M",
];

/// Parses a header's date and time; the first layout that parses wins.
///
/// Month-first is preferred over day-first, so `01/02/2024` is January 2nd
/// while `15/01/2024` can only be day-first. Returns `None` when no layout
/// fits.
pub fn parse_whatsapp_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let year_directive = match date.rsplit('/').next()?.len() {
        2 => "%y",
        4 => "%Y",
        _ => return None,
    };
    let input = format!("{date} {time}");

    TIMESTAMP_LAYOUTS.iter().find_map(|layout| {
        let layout = layout.replace("{Y}", year_directive);
        NaiveDateTime::parse_from_str(&input, &layout).ok()
    })
}
