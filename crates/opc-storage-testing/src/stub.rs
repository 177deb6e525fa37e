// crates/opc-storage-testing/src/stub.rs
// ============================================================================
// Module: Stub Client Builders
// Description: One-call constructors for clients wired to test doubles.
// Purpose: Compose config resolution with the authenticating double.
// Dependencies: opc-storage-client, url
// ============================================================================

//! ## Overview
//! [`blank_test_client`] starts its own double with a no-op delegate and
//! returns it with the client. [`stub_client`] binds a client to an endpoint
//! the caller already runs, for tests that need their own delegate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use opc_storage_client::ClientConfig;
use opc_storage_client::StorageClient;
use url::Url;

use crate::env::Env;
use crate::env::OsEnv;
use crate::error::TestSupportError;
use crate::resolver::storage_test_client;
use crate::server::StubServer;
use crate::server::authenticating_server_with_env;
use crate::server::noop_handler;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identity domain used by [`blank_test_client`].
pub const TEST_DOMAIN: &str = "test-domain";
/// Username used by [`blank_test_client`].
pub const TEST_USER: &str = "test-user";
/// Placeholder used for every credential by [`stub_client`].
pub const STUB_CREDENTIAL: &str = "test";

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Starts a no-op authenticating double and a client pointed at it.
///
/// The password comes from the process environment.
///
/// # Errors
///
/// Returns double setup errors, or the client construction error unchanged.
/// The double is closed before an error is returned.
pub fn blank_test_client() -> Result<(StorageClient, StubServer), TestSupportError> {
    blank_test_client_with_env(&OsEnv)
}

/// Like [`blank_test_client`], reading the environment through `env`.
///
/// # Errors
///
/// See [`blank_test_client`].
pub fn blank_test_client_with_env(
    env: &dyn Env,
) -> Result<(StorageClient, StubServer), TestSupportError> {
    let mut server = authenticating_server_with_env(noop_handler(), env)?;
    let config = ClientConfig::new()
        .with_identity_domain(TEST_DOMAIN)
        .with_username(TEST_USER)
        .with_api_endpoint(server.url().clone());
    match storage_test_client(config, env) {
        Ok(client) => Ok((client, server)),
        Err(err) => {
            server.close();
            Err(err)
        }
    }
}

/// Builds a client with placeholder credentials for a running endpoint.
///
/// # Errors
///
/// Returns [`TestSupportError::Endpoint`] when `endpoint` does not parse, or the
/// client construction error unchanged.
pub fn stub_client(endpoint: &str) -> Result<StorageClient, TestSupportError> {
    stub_client_for_url(Url::parse(endpoint)?)
}

/// Builds a client with placeholder credentials for an already parsed endpoint.
///
/// # Errors
///
/// Returns the client construction error unchanged.
pub fn stub_client_for_url(endpoint: Url) -> Result<StorageClient, TestSupportError> {
    let config = ClientConfig::new()
        .with_identity_domain(STUB_CREDENTIAL)
        .with_username(STUB_CREDENTIAL)
        .with_password(STUB_CREDENTIAL)
        .with_api_endpoint(endpoint);
    storage_test_client(config, &OsEnv)
}
