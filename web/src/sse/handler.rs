use crate::error::Result;
use ::sse::connection::{ChannelTransport, Transport};
use ::sse::delay::PayloadDelay;
use ::sse::{Session, StreamTiming};
use async_stream::stream;
use axum::extract::State;
use axum::http::header::{HeaderName, CONNECTION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::stream::Stream;
use log::*;
use service::AppState;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// SSE handler that streams heartbeat and time events to one client until it
/// disconnects. Each request gets its own session task.
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (transport, receiver) = ChannelTransport::pair();
    open_stream(
        transport,
        &headers,
        app_state.stream_timing.clone(),
        event_stream(receiver),
    )
}

/// Negotiates, commits the streaming response head and hands the connection
/// to a spawned session. `body` must be fed by `transport`.
pub(crate) fn open_stream<T, B>(
    transport: T,
    headers: &HeaderMap,
    timing: StreamTiming,
    body: B,
) -> Result<Response>
where
    T: Transport,
    T::Flusher: 'static,
    T::Disconnect: 'static,
    B: IntoResponse,
{
    let delays = PayloadDelay::from_entropy(timing.max_payload_delay);
    let mut session = Session::open(transport, headers, timing, delays)?;

    let response = (StatusCode::OK, stream_headers(), body).into_response();
    session.headers_sent();

    debug!("Starting SSE session {}", session.id().as_str());
    tokio::spawn(session.run());

    Ok(response)
}

/// Headers on top of the ones `Sse` sets itself.
fn stream_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        // Tells nginx to pass the response through unbuffered
        (
            HeaderName::from_static("x-accel-buffering"),
            HeaderValue::from_static("no"),
        ),
        (CONNECTION, HeaderValue::from_static("keep-alive")),
    ]
}

/// Turns the receiving end of a `ChannelTransport` into an `Sse` body. Hyper
/// dropping the body closes the channel, which ends the session. No
/// keep-alive is configured; the session sends its own heartbeats.
fn event_stream(
    mut receiver: mpsc::Receiver<Event>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    Sse::new(stream! {
        while let Some(event) = receiver.recv().await {
            yield Ok::<_, Infallible>(event);
        }
    })
}
