use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors of the web layer. Stream errors are translated from the `sse`
/// crate and kept as the source so their diagnostic reaches the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: WebErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    /// An event stream could not be started.
    Stream,
    /// The listener could not bind its address.
    Bind { address: String },
    /// The server stopped accepting connections.
    Serve,
}

impl Error {
    pub fn bind(address: &str, err: std::io::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            error_kind: WebErrorKind::Bind {
                address: address.to_string(),
            },
        }
    }

    pub fn serve(err: std::io::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            error_kind: WebErrorKind::Serve,
        }
    }

    fn source_text(&self) -> String {
        self.source
            .as_ref()
            .map(|source| source.to_string())
            .unwrap_or_default()
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match &self.error_kind {
            WebErrorKind::Stream => write!(fmt, "{}", self.source_text()),
            WebErrorKind::Bind { address } => {
                write!(fmt, "unable to bind {address}: {}", self.source_text())
            }
            WebErrorKind::Serve => write!(fmt, "server error: {}", self.source_text()),
        }
    }
}

// Negotiation failures are answered with 500 and the reason in plain text so
// that whoever is debugging the proxy setup can read it from the response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.error_kind {
            WebErrorKind::Stream => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.source_text()).into_response()
            }
            WebErrorKind::Bind { .. } | WebErrorKind::Serve => {
                error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl From<::sse::error::Error> for Error {
    fn from(err: ::sse::error::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            error_kind: WebErrorKind::Stream,
        }
    }
}
