//! Error types for the restaurant API client.
//!
//! # Design
//! Every operation either returns a normalized value or fails with exactly one
//! of these variants. A 404 is not special-cased: all non-2xx responses land in
//! `Network` with the status code, its canonical reason and the raw body.

use thiserror::Error;

/// Errors returned by `ResourceClient` operations and `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A precondition failed before any I/O was attempted (empty id, missing
    /// required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The server answered with a status outside 2xx.
    #[error("HTTP {status} {status_text}: {body}")]
    Network {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A 2xx response body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    DataShape(String),

    /// The request never produced a response (DNS, connection refused, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status carried by a `Network` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}
