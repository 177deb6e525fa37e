// crates/opc-storage-client/src/client.rs
// ============================================================================
// Module: Storage Client
// Description: Cookie-authenticated client bound to a storage API endpoint.
// Purpose: Validate configuration and send session-carrying requests.
// Dependencies: reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`StorageClient`] is constructed from a fully populated [`ClientConfig`].
//! It logs in against [`AUTHENTICATE_PATH`], keeps the issued session cookie,
//! and attaches it to every subsequent request. Resource-level operations are
//! layered on top of [`StorageClient::send_request`] by callers.
//! Invariants:
//! - Construction fails closed when any required field is unset.
//! - Responses are returned to the caller whatever their status, except for
//!   the login exchange which requires a success status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Mutex;
use std::sync::PoisonError;

use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use serde_json::json;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path of the provider's cookie login endpoint.
pub const AUTHENTICATE_PATH: &str = "/authenticate/";

/// User agent sent when the configuration does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("opc-storage-client/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// SECTION: Client
// ============================================================================

/// Client for the provider's storage REST API.
///
/// # Invariants
/// - Identity, credentials, endpoint, and transport are always present.
/// - The session cookie is `None` until [`StorageClient::authenticate`] succeeds.
pub struct StorageClient {
    /// Identity domain the credentials belong to.
    identity_domain: String,
    /// Account username.
    username: String,
    /// Account password.
    password: String,
    /// Base address of the storage REST API.
    api_endpoint: Url,
    /// User agent attached to every request.
    user_agent: String,
    /// HTTP transport used for all requests.
    http: Client,
    /// Session cookie issued by the login endpoint.
    session: Mutex<Option<String>>,
}

impl StorageClient {
    /// Creates a client from a fully populated configuration.
    ///
    /// Empty credential strings are accepted; the provider rejects them at
    /// login time rather than here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] when a required field is unset and
    /// [`ClientError::InvalidEndpoint`] when the endpoint is not an HTTP(S)
    /// address with a host.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let identity_domain =
            config.identity_domain.clone().ok_or(ClientError::MissingField("identity_domain"))?;
        let username = config.username.clone().ok_or(ClientError::MissingField("username"))?;
        let password = config.password.clone().ok_or(ClientError::MissingField("password"))?;
        let api_endpoint =
            config.api_endpoint.clone().ok_or(ClientError::MissingField("api_endpoint"))?;
        let http = config.http_client.clone().ok_or(ClientError::MissingField("http_client"))?;
        validate_endpoint(&api_endpoint)?;
        Ok(Self {
            identity_domain,
            username,
            password,
            api_endpoint,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            http,
            session: Mutex::new(None),
        })
    }

    /// Returns the identity domain.
    #[must_use]
    pub fn identity_domain(&self) -> &str {
        &self.identity_domain
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the API endpoint.
    #[must_use]
    pub const fn api_endpoint(&self) -> &Url {
        &self.api_endpoint
    }

    /// Returns the user agent attached to requests.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the current session cookie (`name=value`), if logged in.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Logs in and stores the issued session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for non-success responses,
    /// [`ClientError::MissingSession`] when no cookie is issued, and
    /// [`ClientError::Transport`] when the request cannot be sent.
    pub fn authenticate(&self) -> Result<(), ClientError> {
        let body = json!({
            "user": format!("/Compute-{}/{}", self.identity_domain, self.username),
            "password": self.password,
        });
        let response = self.send_request(Method::POST, AUTHENTICATE_PATH, Some(&body))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: AUTHENTICATE_PATH.to_string(),
            });
        }
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(cookie_pair)
            .ok_or(ClientError::MissingSession)?;
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(cookie);
        Ok(())
    }

    /// Sends a request to `path` relative to the API endpoint.
    ///
    /// The session cookie is attached when present. The response is returned
    /// as-is; status handling belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPath`] when the URL cannot be built and
    /// [`ClientError::Transport`] when the request cannot be sent.
    pub fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, ClientError> {
        let url = self.url_for(path)?;
        let mut request = self.http.request(method, url).header(USER_AGENT, &self.user_agent);
        if let Some(cookie) = self.session_cookie() {
            request = request.header(COOKIE, cookie);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().map_err(|err| ClientError::Transport(err.to_string()))
    }

    /// Builds the absolute URL for a path under the API endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPath`] when the joined URL does not parse.
    pub fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.api_endpoint.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Url::parse(&joined).map_err(|err| ClientError::InvalidPath(format!("{path}: {err}")))
    }
}

impl fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageClient")
            .field("identity_domain", &self.identity_domain)
            .field("username", &self.username)
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects endpoints that cannot serve as an HTTP request base.
fn validate_endpoint(endpoint: &Url) -> Result<(), ClientError> {
    match endpoint.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::InvalidEndpoint(format!("unsupported scheme {other}")));
        }
    }
    if endpoint.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidEndpoint("endpoint host required".to_string()));
    }
    Ok(())
}

/// Extracts the `name=value` pair from a `Set-Cookie` header value.
fn cookie_pair(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    if pair.contains('=') { Some(pair.to_string()) } else { None }
}
