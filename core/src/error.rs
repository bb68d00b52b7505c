//! Error types for the request client.
//!
//! # Design
//! Every operation reports failures through `ApiError`. A non-2xx response
//! becomes `Rejected`, which keeps the server's JSON error body untouched and
//! also carries a human-readable `message` derived from it, so callers can
//! branch on the body or show the message without knowing which endpoint
//! produced it. Transport failures pass through unwrapped.

use thiserror::Error;

/// Errors returned by `RequestClient` operations and `ApiCodec` parsers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The session provider had no token for the current user.
    #[error("no session token available; the user is not signed in")]
    MissingSession,

    /// The request was rejected locally before anything was sent.
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response body was not the expected JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a rejected response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's error body, exactly as received.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Failures raised by a `Transport` before a response was available.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    /// The blocking task driving the request was cancelled or panicked.
    #[error("request aborted: {0}")]
    Aborted(String),
}
