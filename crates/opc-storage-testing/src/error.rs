// crates/opc-storage-testing/src/error.rs
// ============================================================================
// Module: Test Support Errors
// Description: Failures raised while setting up doubles and stub clients.
// Purpose: Separate setup failures from client construction failures.
// Dependencies: opc-storage-client, thiserror, url
// ============================================================================

//! ## Overview
//! Failures raised while setting up doubles and stub clients.

use opc_storage_client::ClientError;
use thiserror::Error;

/// Errors raised while building test doubles or stub clients.
#[derive(Debug, Error)]
pub enum TestSupportError {
    /// The double could not bind its listener.
    #[error("stub server bind failed: {0}")]
    Bind(String),
    /// The listener address is not an IP socket address.
    #[error("stub server address unavailable: {0}")]
    Address(String),
    /// An endpoint address did not parse as a URL.
    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The default HTTP transport could not be built.
    #[error("default transport build failed: {0}")]
    Transport(String),
    /// Client construction failed; reported unchanged.
    #[error(transparent)]
    Client(#[from] ClientError),
}
