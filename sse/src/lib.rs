//! Server-Sent Events (SSE) streaming core.
//!
//! Each client that asks for `text/event-stream` gets its own [`Session`],
//! which owns the connection until the client goes away.
//!
//! # Session lifecycle
//!
//! 1. `Negotiating`: the transport must be able to flush partial responses
//!    and the `Accept` header must be exactly `text/event-stream`. Failures
//!    are reported before any header is committed.
//! 2. `HeadersSent`: status and streaming headers are fixed.
//! 3. `PreambleSent`: a 2 KiB padding comment and a 2000 ms `retry` directive
//!    push old browsers and proxies past their buffering threshold.
//! 4. `Streaming`: a single loop waits on the disconnect signal, a fixed
//!    30 second heartbeat and a randomly re-armed payload timer, emitting one
//!    framed event per wake-up.
//! 5. `Closed`: reached once, on disconnect or on the first failed write.
//!
//! Sessions share no state. Each owns its own id clock and random generator.
//!
//! # Modules
//!
//! - `connection`: transport capabilities (`Flusher`, `Disconnect`), the
//!   channel-backed transport and the per-session `StreamContext`
//! - `negotiation`: request checks performed before streaming starts
//! - `session`: the stream state machine and event loop
//! - `message`: event types and their framing as axum `Sse` events
//! - `clock`, `delay`: event ids and payload pacing

pub mod clock;
pub mod connection;
pub mod delay;
pub mod error;
pub mod message;
pub mod negotiation;
pub mod session;

#[cfg(test)]
pub(crate) mod fakes;

pub use connection::{ChannelTransport, ConnectionId};
pub use session::{CloseReason, Session, SessionState, StreamTiming};
