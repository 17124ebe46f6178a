use crate::error::{Error, Result};
use async_trait::async_trait;
use axum::response::sse::Event as SseEvent;
use tokio::sync::mpsc;

/// Unique identifier for a connection (server-generated), used to tie log
/// lines of one stream together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pushes one framed event to the network right away.
#[async_trait]
pub trait Flusher: Send + Sync {
    async fn flush(&mut self, event: SseEvent) -> Result<()>;
}

/// Resolves once the peer has gone away or the request was cancelled.
#[async_trait]
pub trait Disconnect: Send + Sync {
    async fn disconnected(&self);
}

/// The connection a response is written to.
pub trait Transport {
    type Flusher: Flusher;
    type Disconnect: Disconnect;

    /// Splits the connection into its streaming capabilities, or returns
    /// `None` when partial responses cannot be flushed to the network.
    fn into_parts(self) -> Option<(Self::Flusher, Self::Disconnect)>;
}

/// A transport backed by a bounded channel whose receiving end feeds the
/// `Sse` response body. Dropping the body (the client went away) closes the
/// channel, which is what `Disconnect` observes.
#[derive(Debug)]
pub struct ChannelTransport {
    sender: mpsc::Sender<SseEvent>,
}

impl ChannelTransport {
    /// Capacity of one keeps at most a single event in flight.
    pub fn pair() -> (Self, mpsc::Receiver<SseEvent>) {
        let (sender, receiver) = mpsc::channel(1);
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    type Flusher = ChannelFlusher;
    type Disconnect = ChannelDisconnect;

    fn into_parts(self) -> Option<(ChannelFlusher, ChannelDisconnect)> {
        let watcher = ChannelDisconnect {
            sender: self.sender.clone(),
        };
        Some((
            ChannelFlusher {
                sender: self.sender,
            },
            watcher,
        ))
    }
}

#[derive(Debug)]
pub struct ChannelFlusher {
    sender: mpsc::Sender<SseEvent>,
}

#[async_trait]
impl Flusher for ChannelFlusher {
    async fn flush(&mut self, event: SseEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| Error::session_io("response body receiver dropped"))
    }
}

#[derive(Debug)]
pub struct ChannelDisconnect {
    sender: mpsc::Sender<SseEvent>,
}

#[async_trait]
impl Disconnect for ChannelDisconnect {
    async fn disconnected(&self) {
        self.sender.closed().await
    }
}

/// Outgoing queue, flusher and disconnect signal of one session.
pub struct StreamContext<F, D> {
    pending: Vec<SseEvent>,
    flusher: F,
    disconnect: D,
}

impl<F: Flusher, D: Disconnect> StreamContext<F, D> {
    pub fn new(flusher: F, disconnect: D) -> Self {
        Self {
            pending: Vec::new(),
            flusher,
            disconnect,
        }
    }

    /// Queues an event until the next `flush`.
    pub fn write(&mut self, event: SseEvent) {
        self.pending.push(event);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Sends everything queued, in order, one event per chunk. Stops at the
    /// first failure; whatever was not sent is discarded.
    pub async fn flush(&mut self) -> Result<()> {
        for event in std::mem::take(&mut self.pending) {
            self.flusher.flush(event).await?;
        }
        Ok(())
    }

    pub async fn disconnected(&self) {
        self.disconnect.disconnected().await
    }
}
