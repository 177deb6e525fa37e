// crates/opc-storage-client/src/error.rs
// ============================================================================
// Module: Storage Client Errors
// Description: Error taxonomy for client construction and requests.
// Purpose: Give callers stable, matchable failure variants.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Error taxonomy for client construction and requests.

use thiserror::Error;

/// Errors raised while constructing or using a [`crate::StorageClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A field required at construction time was not set.
    #[error("missing required client config field: {0}")]
    MissingField(&'static str),
    /// The API endpoint cannot be used as a request base.
    #[error("invalid api endpoint: {0}")]
    InvalidEndpoint(String),
    /// A request path could not be joined onto the endpoint.
    #[error("invalid request path: {0}")]
    InvalidPath(String),
    /// The HTTP transport failed before a response was received.
    #[error("http transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {path}")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
        /// Request path that produced the status.
        path: String,
    },
    /// Authentication succeeded but no session cookie was issued.
    #[error("authentication response did not carry a session cookie")]
    MissingSession,
}
