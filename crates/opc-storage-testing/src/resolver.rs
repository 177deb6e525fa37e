// crates/opc-storage-testing/src/resolver.rs
// ============================================================================
// Module: Config Resolver
// Description: Fills unset client configuration from environment fallbacks.
// Purpose: Build storage clients for tests with layered defaults.
// Dependencies: opc-storage-client, reqwest
// ============================================================================

//! ## Overview
//! Resolution layers environment values under explicit configuration: a field
//! that is already set is never replaced. Credentials missing from both sources
//! resolve to empty strings, and a default transport is synthesized when none
//! was injected.
//! Invariants:
//! - After [`resolve`], identity domain, username, password, and transport are
//!   all present.
//! - Environment reads go through [`Env`] only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use opc_storage_client::ClientConfig;
use opc_storage_client::StorageClient;
use reqwest::blocking::Client;

use crate::env::Env;
use crate::error::TestSupportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable supplying the identity domain.
pub const IDENTITY_DOMAIN_ENV: &str = "OPC_IDENTITY_DOMAIN";
/// Environment variable supplying the username.
pub const USERNAME_ENV: &str = "OPC_USERNAME";
/// Environment variable supplying the password.
pub const PASSWORD_ENV: &str = "OPC_PASSWORD";
/// Connection handshake timeout applied to the default transport.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Fills unset credentials from the environment.
///
/// Absent variables resolve to empty strings.
pub fn resolve_credentials(config: &mut ClientConfig, env: &dyn Env) {
    fill_from_env(&mut config.identity_domain, env, IDENTITY_DOMAIN_ENV);
    fill_from_env(&mut config.username, env, USERNAME_ENV);
    fill_from_env(&mut config.password, env, PASSWORD_ENV);
}

/// Settings for transports synthesized by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    /// Upper bound on establishing a connection, TLS handshake included.
    pub connect_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: HANDSHAKE_TIMEOUT,
        }
    }
}

impl TransportSettings {
    /// Builds a blocking client from these settings.
    ///
    /// Proxy settings are taken from the ambient `HTTP_PROXY`, `HTTPS_PROXY`,
    /// and `NO_PROXY` variables.
    ///
    /// # Errors
    ///
    /// Returns [`TestSupportError::Transport`] when the client cannot be built.
    pub fn build(&self) -> Result<Client, TestSupportError> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|err| TestSupportError::Transport(err.to_string()))
    }
}

/// Builds the transport used when a configuration does not inject one.
///
/// # Errors
///
/// Returns [`TestSupportError::Transport`] when the client cannot be built.
pub fn default_transport() -> Result<Client, TestSupportError> {
    TransportSettings::default().build()
}

/// Resolves every fallback-able field of `config`.
///
/// # Errors
///
/// Returns [`TestSupportError::Transport`] when a default transport is needed
/// and cannot be built.
pub fn resolve(mut config: ClientConfig, env: &dyn Env) -> Result<ClientConfig, TestSupportError> {
    resolve_credentials(&mut config, env);
    if config.http_client.is_none() {
        config.http_client = Some(default_transport()?);
    }
    Ok(config)
}

/// Resolves `config` and constructs a client from it.
///
/// # Errors
///
/// Returns [`TestSupportError::Transport`] when the default transport cannot
/// be built and [`TestSupportError::Client`] carrying the client's own error
/// when construction fails.
pub fn storage_test_client(
    config: ClientConfig,
    env: &dyn Env,
) -> Result<StorageClient, TestSupportError> {
    let config = resolve(config, env)?;
    Ok(StorageClient::new(&config)?)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Sets `slot` from `key` when it is still unset.
fn fill_from_env(slot: &mut Option<String>, env: &dyn Env, key: &str) {
    if slot.is_none() {
        *slot = Some(env.var(key).unwrap_or_default());
    }
}
