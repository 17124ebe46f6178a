//! Error types for the `sse` crate.
//!
//! Follows the same pattern as the other layers: a root `Error` struct holding
//! an error kind tree and an optional source for chaining.

use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in a stream's life.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The request was refused before any header was sent.
    Negotiation(NegotiationErrorKind),
    /// The connection failed after streaming started.
    Session(SessionErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum NegotiationErrorKind {
    /// The transport would hold the response until it completes.
    StreamingUnsupported,
    /// The client asked for something other than an event stream.
    ProtocolMismatch { expected: String, actual: String },
}

#[derive(Debug, PartialEq)]
pub enum SessionErrorKind {
    Io,
}

impl Error {
    pub fn streaming_unsupported() -> Self {
        Self {
            source: None,
            error_kind: ErrorKind::Negotiation(NegotiationErrorKind::StreamingUnsupported),
        }
    }

    pub fn protocol_mismatch(expected: &str, actual: &str) -> Self {
        Self {
            source: None,
            error_kind: ErrorKind::Negotiation(NegotiationErrorKind::ProtocolMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }),
        }
    }

    pub fn session_io<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            source: Some(err.into()),
            error_kind: ErrorKind::Session(SessionErrorKind::Io),
        }
    }

    pub fn is_negotiation(&self) -> bool {
        matches!(self.error_kind, ErrorKind::Negotiation(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Negotiation(NegotiationErrorKind::StreamingUnsupported) => write!(
                f,
                "unable to flush partial responses on this connection; \
                 this is probably due to a proxy buffering the response"
            ),
            ErrorKind::Negotiation(NegotiationErrorKind::ProtocolMismatch { expected, actual }) => {
                write!(
                    f,
                    "Accept header: want {expected:?}, have {actual:?}; \
                     seems like the browser doesn't support server-sent events"
                )
            }
            ErrorKind::Session(SessionErrorKind::Io) => match &self.source {
                Some(source) => write!(f, "event stream I/O failure: {source}"),
                None => write!(f, "event stream I/O failure"),
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
