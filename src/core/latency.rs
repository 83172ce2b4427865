//! Reply-latency computation.

use tracing::info;

use crate::event::{Event, sort_chronologically};

/// Sorts events chronologically and sets `reply_latency_seconds`.
///
/// An event gets a latency only when its sender differs from the sender of
/// the event directly before it; the value is the whole-second gap between
/// the two. The first event and same-sender runs get `None`. Events with
/// equal timestamps keep their input order.
pub fn compute_reply_latency(mut events: Vec<Event>) -> Vec<Event> {
    sort_chronologically(&mut events);

    let mut replies = 0usize;
    for i in 0..events.len() {
        let latency = match i.checked_sub(1).map(|p| &events[p]) {
            Some(prev) if prev.sender_id != events[i].sender_id => {
                Some((events[i].timestamp - prev.timestamp).num_seconds() as f64)
            }
            _ => None,
        };
        replies += usize::from(latency.is_some());
        events[i].reply_latency_seconds = latency;
    }

    info!(events = events.len(), replies, "Computed reply latency");
    events
}
