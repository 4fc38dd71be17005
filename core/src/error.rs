//! Error types for the dispatcher.
//!
//! # Design
//! `TransportError` is an outcome, not a failure of the dispatcher: it is the
//! value handed to `on_error`. Its `Display` output is the human-readable
//! message a call site shows to the user. `ConfigError` is the only error a
//! caller sees through `Result`.

use thiserror::Error;

/// A network, server or malformed-response failure for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response: connection refused, DNS
    /// failure, broken read.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status other than the
    /// validation status.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The server answered, but the body does not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request could not be built (empty endpoint, unusable URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Status code of a `Server` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Invalid dispatcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme {scheme:?} in base url, expected http or https")]
    UnsupportedScheme { scheme: String },
}
