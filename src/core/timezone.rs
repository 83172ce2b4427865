//! Local hour-of-day normalization.

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use tracing::{debug, info};

use crate::config::TimezoneConfig;
use crate::event::Event;

/// Sets `hour_of_day_local` on every event.
///
/// Without a configuration the events are returned untouched and
/// `hour_of_day_local` stays absent. With a configuration the hour is taken
/// from the timestamp after adding the platform's minute offset (zero when
/// the platform has none). Order and count are preserved.
///
/// # Example
///
/// ```rust
/// use chat_timeline::config::TimezoneConfig;
/// use chat_timeline::core::normalize_timezone;
/// use chat_timeline::event::Event;
/// use chat_timeline::parser::Platform;
/// use chrono::NaiveDate;
///
/// let ts = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(23, 30, 0).unwrap();
/// let events = vec![Event::new(ts, "You", Platform::Instagram, "late")];
///
/// let config = TimezoneConfig::new().with_offset(Platform::Instagram, 60);
/// let events = normalize_timezone(events, Some(&config));
/// assert_eq!(events[0].hour_of_day_local, Some(0));
/// ```
pub fn normalize_timezone(mut events: Vec<Event>, config: Option<&TimezoneConfig>) -> Vec<Event> {
    let Some(config) = config else {
        info!("No timezone config found, skipping hour normalization");
        return events;
    };

    for event in &mut events {
        let offset = config.offset_minutes(event.platform);
        event.hour_of_day_local = Some(shifted(event.timestamp, offset).hour());
    }

    debug!(events = events.len(), offsets = ?config.platform_offsets_minutes, "Normalized local hours");
    events
}

/// Shifts `ts` by `minutes`, leaving it unchanged if the result is out of range.
fn shifted(ts: NaiveDateTime, minutes: i32) -> NaiveDateTime {
    TimeDelta::try_minutes(i64::from(minutes))
        .and_then(|delta| ts.checked_add_signed(delta))
        .unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Platform;
    use chrono::NaiveDate;

    fn event(h: u32, platform: Platform) -> Event {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, 15, 0)
            .unwrap();
        Event::new(ts, "You", platform, "x")
    }

    #[test]
    fn test_no_config_is_noop() {
        let events = vec![event(5, Platform::WhatsApp), event(6, Platform::Instagram)];
        let out = normalize_timezone(events.clone(), None);
        assert_eq!(out, events);
        assert!(out.iter().all(|e| e.hour_of_day_local.is_none()));
    }

    #[test]
    fn test_config_without_offsets_uses_stored_hour() {
        let events = vec![event(5, Platform::WhatsApp), event(23, Platform::Instagram)];
        let out = normalize_timezone(events, Some(&TimezoneConfig::new()));
        assert_eq!(out[0].hour_of_day_local, Some(5));
        assert_eq!(out[1].hour_of_day_local, Some(23));
    }

    #[test]
    fn test_platform_offsets() {
        let config = TimezoneConfig::new()
            .with_offset(Platform::Instagram, -120)
            .with_offset(Platform::WhatsApp, 30);
        let events = vec![event(1, Platform::Instagram), event(23, Platform::WhatsApp)];
        let out = normalize_timezone(events, Some(&config));

        assert_eq!(out[0].hour_of_day_local, Some(23));
        assert_eq!(out[1].hour_of_day_local, Some(23));
        // Timestamps themselves are not rewritten.
        assert_eq!(out[0].timestamp.hour(), 1);
    }

    #[test]
    fn test_order_and_count_preserved() {
        let events = vec![
            event(9, Platform::WhatsApp),
            event(3, Platform::Instagram),
            event(17, Platform::WhatsApp),
        ];
        let out = normalize_timezone(events.clone(), Some(&TimezoneConfig::new()));
        assert_eq!(out.len(), 3);
        for (a, b) in out.iter().zip(&events) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.timestamp, b.timestamp);
        }
    }
}
