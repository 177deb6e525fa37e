// crates/opc-storage-testing/src/body.rs
// ============================================================================
// Module: Request Body Decoding
// Description: JSON decoding of request bodies received by test doubles.
// Purpose: Let delegate handlers assert on the shape of client payloads.
// Dependencies: serde, serde_json, thiserror, tiny_http
// ============================================================================

//! ## Overview
//! [`decode_request_body`] is an assertion: a body that cannot be read or does
//! not decode into the target type fails the calling test on the spot.
//! [`try_decode_request_body`] reports the same failures as [`BodyError`] for
//! handlers that want to answer with an error status instead.
//! The body is consumed; a second decode of the same request sees no bytes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::de::DeserializeOwned;
use thiserror::Error;
use tiny_http::Request;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request body decoding failures.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body could not be read.
    #[error("request body read failed: {0}")]
    Read(String),
    /// The body is not valid JSON for the target type.
    #[error("request body decode failed: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Reads the whole body of `request` and decodes it as JSON.
///
/// # Errors
///
/// Returns [`BodyError::Read`] when the body cannot be read and
/// [`BodyError::Decode`] when it does not decode into `T`.
pub fn try_decode_request_body<T: DeserializeOwned>(request: &mut Request) -> Result<T, BodyError> {
    let mut body = Vec::new();
    request.as_reader().read_to_end(&mut body).map_err(|err| BodyError::Read(err.to_string()))?;
    serde_json::from_slice(&body).map_err(|err| BodyError::Decode(err.to_string()))
}

/// Reads and decodes the body of `request`, failing the test on error.
///
/// # Panics
///
/// Panics with the decoding error when the body cannot be read or decoded.
#[allow(clippy::panic, reason = "Decoding failures are test assertions, not recoverable errors.")]
pub fn decode_request_body<T: DeserializeOwned>(request: &mut Request) -> T {
    match try_decode_request_body(request) {
        Ok(value) => value,
        Err(err) => panic!("error unmarshalling request body: {err}"),
    }
}
