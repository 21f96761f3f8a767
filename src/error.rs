//! Error types for the Keenetic API client.
//!
//! Every failure is surfaced immediately to the caller of the operation in
//! progress. Nothing in this crate retries.

use thiserror::Error;

/// A specialized `Result` type for Keenetic operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Keenetic client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed inside the reqwest transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Network failure reported by a custom transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `/auth` endpoint did not behave like a Keenetic device
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The device asked for an authentication method this client lacks
    #[error("This client doesn't support auth method {0:?}")]
    UnsupportedAuthMethod(String),

    /// A status-checked request returned a non-2xx status
    #[error("HTTP status error: status={status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body for debugging
        body: String,
    },

    /// A response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A request was issued before `connect` or after `close`
    #[error("Client is not connected")]
    NotConnected,

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the failure happened in the network layer.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Transport(_))
    }

    /// Returns `true` if this error was raised by the authentication handshake
    /// itself rather than by a failed HTTP exchange.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Protocol(_) | Error::UnsupportedAuthMethod(_))
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
