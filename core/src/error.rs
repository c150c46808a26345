//! Error types for the account API client.
//!
//! # Design
//! Only `Request` is a recognised application error: its message is the
//! backend's own text and is shown to the user verbatim. Every other variant
//! is surfaced by the controller through a generic fallback message.

use thiserror::Error;

/// Message used when a non-2xx response carries an empty body.
pub const REQUEST_FAILED: &str = "request failed";

/// Errors produced while building requests or parsing responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The host could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A success body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build a `Request` error from a failed response body.
    pub fn request(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            REQUEST_FAILED.to_string()
        } else {
            body.to_string()
        };
        ApiError::Request { status, message }
    }

    /// The user-facing message for recognised errors, `None` otherwise.
    pub fn request_message(&self) -> Option<&str> {
        match self {
            ApiError::Request { message, .. } => Some(message),
            _ => None,
        }
    }
}
