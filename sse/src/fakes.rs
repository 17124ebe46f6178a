use crate::connection::{Disconnect, Flusher, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use axum::response::sse::{Event as SseEvent, Sse};
use axum::response::IntoResponse;
use eventsource_stream::{Event as DecodedEvent, Eventsource};
use futures_util::{stream, StreamExt};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::time::Instant;

/// The bytes `event` puts on the wire inside an `Sse` response body.
pub async fn render(event: SseEvent) -> String {
    let body = Sse::new(stream::iter([Ok::<_, Infallible>(event)]))
        .into_response()
        .into_body();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Parses recorded chunks the way an `EventSource` client would.
pub async fn decode(chunks: &[String]) -> Vec<DecodedEvent> {
    stream::iter(chunks.iter().cloned().map(Ok::<_, Infallible>))
        .eventsource()
        .map(|event| event.unwrap())
        .collect()
        .await
}

/// Reconnect delay announced by a `retry:` line, if any.
pub fn retry_millis(wire: &str) -> Option<u64> {
    wire.lines()
        .find_map(|line| line.strip_prefix("retry:"))
        .and_then(|value| value.trim().parse().ok())
}

/// A transport that can only deliver a response once it is complete.
pub struct BufferingTransport;

impl Transport for BufferingTransport {
    type Flusher = RecordingFlusher;
    type Disconnect = RecordingDisconnect;

    fn into_parts(self) -> Option<(RecordingFlusher, RecordingDisconnect)> {
        None
    }
}

#[derive(Debug, Default)]
struct Recorded {
    chunks: Vec<(Instant, String)>,
    failing: bool,
    disconnected: bool,
    flushes_after_disconnect: usize,
}

/// Records every flushed chunk with the (virtual) time it was sent.
pub struct RecordingTransport {
    recorded: Arc<Mutex<Recorded>>,
    gone: watch::Receiver<bool>,
    parts: Arc<()>,
}

pub struct RecordingHandle {
    recorded: Arc<Mutex<Recorded>>,
    gone: watch::Sender<bool>,
    parts: Arc<()>,
}

impl RecordingTransport {
    pub fn new() -> (Self, RecordingHandle) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let (sender, receiver) = watch::channel(false);
        let parts = Arc::new(());
        let handle = RecordingHandle {
            recorded: recorded.clone(),
            gone: sender,
            parts: parts.clone(),
        };
        let transport = Self {
            recorded,
            gone: receiver,
            parts,
        };
        (transport, handle)
    }
}

impl Transport for RecordingTransport {
    type Flusher = RecordingFlusher;
    type Disconnect = RecordingDisconnect;

    fn into_parts(self) -> Option<(RecordingFlusher, RecordingDisconnect)> {
        let flusher = RecordingFlusher {
            recorded: self.recorded,
            _part: self.parts.clone(),
        };
        let disconnect = RecordingDisconnect {
            gone: self.gone,
            _part: self.parts,
        };
        Some((flusher, disconnect))
    }
}

#[derive(Debug)]
pub struct RecordingFlusher {
    recorded: Arc<Mutex<Recorded>>,
    _part: Arc<()>,
}

#[async_trait]
impl Flusher for RecordingFlusher {
    async fn flush(&mut self, event: SseEvent) -> Result<()> {
        let text = render(event).await;
        let mut recorded = self.recorded.lock().unwrap();
        if recorded.disconnected {
            recorded.flushes_after_disconnect += 1;
            return Err(Error::session_io("peer disconnected"));
        }
        if recorded.failing {
            return Err(Error::session_io("connection reset by peer"));
        }
        recorded.chunks.push((Instant::now(), text));
        Ok(())
    }
}

#[derive(Debug)]
pub struct RecordingDisconnect {
    gone: watch::Receiver<bool>,
    _part: Arc<()>,
}

#[async_trait]
impl Disconnect for RecordingDisconnect {
    async fn disconnected(&self) {
        let mut gone = self.gone.clone();
        let _ = gone.wait_for(|gone| *gone).await;
    }
}

impl RecordingHandle {
    pub fn disconnect(&self) {
        self.recorded.lock().unwrap().disconnected = true;
        let _ = self.gone.send(true);
    }

    pub fn fail_writes(&self) {
        self.recorded.lock().unwrap().failing = true;
    }

    pub fn chunks(&self) -> Vec<String> {
        self.timed_chunks()
            .into_iter()
            .map(|(_, chunk)| chunk)
            .collect()
    }

    pub fn timed_chunks(&self) -> Vec<(Instant, String)> {
        self.recorded.lock().unwrap().chunks.clone()
    }

    pub fn flushes_after_disconnect(&self) -> usize {
        self.recorded.lock().unwrap().flushes_after_disconnect
    }

    /// Flusher and disconnect halves still held by a session.
    pub fn live_parts(&self) -> usize {
        Arc::strong_count(&self.parts) - 1
    }
}
