// crates/opc-storage-testing/src/lib.rs
// ============================================================================
// Module: OPC Storage Testing
// Description: Test doubles and stub clients for the storage client.
// Purpose: Stand in for the provider endpoint in storage client tests.
// Dependencies: opc-storage-client, reqwest, serde, serde_json, tiny_http, url
// ============================================================================

//! ## Overview
//! This crate builds the pieces storage client tests share:
//! - [`resolver`] fills unset client configuration from environment fallbacks
//!   and constructs the client.
//! - [`server`] runs a local double that answers the login path with a session
//!   cookie and delegates every other path to a caller-supplied handler.
//! - [`stub`] composes the two into one-call builders.
//! - [`body`] decodes JSON request bodies inside handlers for assertions.
//!
//! Invariants:
//! - Environment reads go through [`Env`] so resolution is deterministic in
//!   tests.
//! - Doubles are released on every exit path, including failed setup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod body;
pub mod env;
pub mod error;
pub mod log;
pub mod resolver;
pub mod server;
pub mod stub;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use body::BodyError;
pub use body::decode_request_body;
pub use body::try_decode_request_body;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;
pub use error::TestSupportError;
pub use log::NoopRequestLog;
pub use log::RequestLog;
pub use log::RequestLogEvent;
pub use log::StderrRequestLog;
pub use log::debug_logging_enabled;
pub use log::request_log_from_env;
pub use resolver::resolve;
pub use resolver::resolve_credentials;
pub use resolver::TransportSettings;
pub use resolver::storage_test_client;
pub use server::RequestHandler;
pub use server::Route;
pub use server::Router;
pub use server::StubResponse;
pub use server::StubServer;
pub use server::authenticating_server;
pub use server::authenticating_server_with_env;
pub use server::noop_handler;
pub use stub::blank_test_client;
pub use stub::blank_test_client_with_env;
pub use stub::stub_client;
pub use stub::stub_client_for_url;
pub use tiny_http::Request;

#[cfg(test)]
mod tests;
