//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the `/events` endpoint.
//! Negotiation, framing and the per-connection event loop live in the `sse`
//! crate.

pub mod handler;
