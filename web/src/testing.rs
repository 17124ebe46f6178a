use eventsource_stream::{Event, Eventsource};
use futures_util::{stream, StreamExt};
use std::convert::Infallible;

/// Parses response chunks the way an `EventSource` client would.
pub(crate) async fn decode(chunks: &[String]) -> Vec<Event> {
    stream::iter(chunks.iter().cloned().map(Ok::<_, Infallible>))
        .eventsource()
        .map(|event| event.unwrap())
        .collect()
        .await
}

/// Reconnect delay announced by a `retry:` line, if any.
pub(crate) fn retry_millis(wire: &str) -> Option<u64> {
    wire.lines()
        .find_map(|line| line.strip_prefix("retry:"))
        .and_then(|value| value.trim().parse().ok())
}
