use axum::response::sse::Event as SseEvent;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::time::Duration;

/// Layout of the `time` event payload, e.g. `Mon Jan  2 15:04:05 UTC 2006`.
pub const TIME_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// Number of padding bytes in the preamble comment. Some browsers and proxies
/// hold back the first 2 KiB of a response before handing it to the page.
pub const PREAMBLE_PADDING: usize = 2049;

/// Events produced by a stream session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Keep-alive for intermediaries that drop idle connections.
    Heartbeat,
    /// Application payload carrying the time it was emitted.
    Time(DateTime<Utc>),
}

impl Event {
    /// Value of the `event:` field.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Heartbeat => "heartbeat",
            Event::Time(_) => "time",
        }
    }

    pub fn data(&self) -> String {
        match self {
            Event::Heartbeat => json!({}).to_string(),
            Event::Time(at) => at.format(TIME_FORMAT).to_string(),
        }
    }

    /// Frames the event under `id`, with `id`, `event` and `data` lines in
    /// that order.
    pub fn into_sse(self, id: u128) -> SseEvent {
        SseEvent::default()
            .id(id.to_string())
            .event(self.name())
            .data(self.data())
    }
}

/// Sent once, before any event: a padding comment followed by the client
/// reconnect delay.
pub fn preamble(padding: usize, retry: Duration) -> SseEvent {
    SseEvent::default()
        .comment(" ".repeat(padding))
        .retry(retry)
}
