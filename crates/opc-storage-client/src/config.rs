// crates/opc-storage-client/src/config.rs
// ============================================================================
// Module: Storage Client Configuration
// Description: Partially populated client configuration.
// Purpose: Carry identity, credentials, endpoint, and transport into the client.
// Dependencies: reqwest, url
// ============================================================================

//! ## Overview
//! [`ClientConfig`] mirrors the provider's client configuration: every field is
//! optional at construction time so callers (and test resolvers) can layer
//! defaults on top of explicit values before handing it to
//! [`crate::StorageClient::new`].
//! Security posture: the password is never rendered by the `Debug` impl.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::blocking::Client;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for a [`crate::StorageClient`].
///
/// # Invariants
/// - Every field is independently optional until the client is constructed.
/// - Explicitly set fields are never replaced by the setters of other fields.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Identity domain (tenant) the credentials belong to.
    pub identity_domain: Option<String>,
    /// Account username.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Base address of the storage REST API.
    pub api_endpoint: Option<Url>,
    /// Injectable HTTP transport.
    pub http_client: Option<Client>,
    /// Optional user agent override.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Creates an empty configuration with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity domain.
    #[must_use]
    pub fn with_identity_domain(mut self, domain: impl Into<String>) -> Self {
        self.identity_domain = Some(domain.into());
        self
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_api_endpoint(mut self, endpoint: Url) -> Self {
        self.api_endpoint = Some(endpoint);
        self
    }

    /// Sets the HTTP transport.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("identity_domain", &self.identity_domain)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("api_endpoint", &self.api_endpoint.as_ref().map(Url::as_str))
            .field("http_client", &self.http_client.is_some())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
