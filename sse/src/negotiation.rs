use crate::connection::Transport;
use crate::error::{Error, Result};
use axum::http::{header::ACCEPT, HeaderMap};
use log::*;

pub const EVENT_STREAM_MIME: &str = "text/event-stream";

/// Checks that a request can be answered with an event stream before any
/// header is committed. The transport is checked first, then `Accept`.
///
/// On success the transport's streaming capabilities are handed back.
pub fn negotiate<T: Transport>(
    transport: T,
    headers: &HeaderMap,
) -> Result<(T::Flusher, T::Disconnect)> {
    let parts = transport.into_parts().ok_or_else(|| {
        warn!("Refusing event stream: transport cannot flush partial responses");
        Error::streaming_unsupported()
    })?;

    let accept = headers
        .get(ACCEPT)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    if accept != EVENT_STREAM_MIME {
        warn!("Refusing event stream: Accept header was {accept:?}");
        return Err(Error::protocol_mismatch(EVENT_STREAM_MIME, &accept));
    }

    Ok(parts)
}
