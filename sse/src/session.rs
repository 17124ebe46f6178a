use crate::clock::EventIdClock;
use crate::connection::{ConnectionId, Disconnect, Flusher, StreamContext, Transport};
use crate::delay::PayloadDelay;
use crate::error::{Error, Result};
use crate::message::{self, Event, PREAMBLE_PADDING};
use crate::negotiation::negotiate;
use axum::http::HeaderMap;
use chrono::Utc;
use log::*;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Fixed pacing of every stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamTiming {
    /// Period of `heartbeat` events, independent of any other traffic.
    pub heartbeat_interval: Duration,
    /// Exclusive upper bound of the random wait before each `time` event.
    pub max_payload_delay: Duration,
    /// Reconnect delay announced to the client in the preamble.
    pub retry: Duration,
    /// Size of the preamble padding comment in bytes.
    pub padding: usize,
}

impl Default for StreamTiming {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            max_payload_delay: Duration::from_secs(10),
            retry: Duration::from_millis(2000),
            padding: PREAMBLE_PADDING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Negotiating,
    HeadersSent,
    PreambleSent,
    Streaming,
    Closed,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client went away.
    Disconnected,
    /// Writing to the connection failed.
    WriteFailed,
}

/// One event stream, owning its connection for its whole life.
pub struct Session<F, D> {
    id: ConnectionId,
    context: StreamContext<F, D>,
    ids: EventIdClock,
    delays: PayloadDelay,
    timing: StreamTiming,
    state: SessionState,
}

impl<F: Flusher, D: Disconnect> Session<F, D> {
    /// Negotiates the stream and, on success, returns a session that is ready
    /// to run once the response headers have gone out.
    pub fn open<T>(
        transport: T,
        headers: &HeaderMap,
        timing: StreamTiming,
        delays: PayloadDelay,
    ) -> Result<Self>
    where
        T: Transport<Flusher = F, Disconnect = D>,
    {
        let (flusher, disconnect) = negotiate(transport, headers)?;
        let id = ConnectionId::new();
        debug!("SSE connection {} negotiated", id.as_str());

        Ok(Self {
            id,
            context: StreamContext::new(flusher, disconnect),
            ids: EventIdClock::new(),
            delays,
            timing,
            state: SessionState::Negotiating,
        })
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Records that the status line and headers are fixed. Must be called
    /// before `run`; nothing about the response head changes after this.
    pub fn headers_sent(&mut self) {
        self.transition(SessionState::HeadersSent);
    }

    /// Sends the preamble and then events until the client disconnects or a
    /// write fails.
    pub async fn run(mut self) -> CloseReason {
        info!("SSE connection {} opened", self.id.as_str());

        let reason = match self.send_preamble().await {
            Ok(()) => self.stream().await,
            Err(e) => self.write_failed(e),
        };

        self.transition(SessionState::Closed);
        info!(
            "SSE connection {} closed ({:?})",
            self.id.as_str(),
            reason
        );
        reason
    }

    async fn send_preamble(&mut self) -> Result<()> {
        self.context
            .write(message::preamble(self.timing.padding, self.timing.retry));
        self.context.flush().await?;
        self.transition(SessionState::PreambleSent);
        Ok(())
    }

    /// Runs the event loop.
    ///
    /// The payload delay is redrawn only after a `time` event fires.
    /// Heartbeats leave the pending delay untouched; do not change this to
    /// redraw on every wake-up.
    async fn stream(&mut self) -> CloseReason {
        self.transition(SessionState::Streaming);

        let period = self.timing.heartbeat_interval;
        let mut heartbeat = time::interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let payload = time::sleep(self.delays.next_delay());
        tokio::pin!(payload);

        loop {
            tokio::select! {
                biased;

                _ = self.context.disconnected() => {
                    if self.context.has_pending() {
                        // The peer is gone; a failure here changes nothing.
                        let _ = self.context.flush().await;
                    }
                    return CloseReason::Disconnected;
                }
                _ = heartbeat.tick() => {
                    if let Err(e) = self.emit(Event::Heartbeat).await {
                        return self.write_failed(e);
                    }
                }
                _ = &mut payload => {
                    if let Err(e) = self.emit(Event::Time(Utc::now())).await {
                        return self.write_failed(e);
                    }
                    let next = self.delays.next_delay();
                    payload.as_mut().reset(Instant::now() + next);
                }
            }
        }
    }

    async fn emit(&mut self, event: Event) -> Result<()> {
        let id = self.ids.next_id();
        debug!(
            "Sending {} event {id} on SSE connection {}",
            event.name(),
            self.id.as_str()
        );
        self.context.write(event.into_sse(id));
        self.context.flush().await
    }

    fn write_failed(&self, e: Error) -> CloseReason {
        warn!(
            "SSE connection {} dropped after write failure: {e}",
            self.id.as_str()
        );
        CloseReason::WriteFailed
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        debug!(
            "SSE connection {}: {:?} -> {:?}",
            self.id.as_str(),
            self.state,
            next
        );
        self.state = next;
    }
}
