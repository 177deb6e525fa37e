// crates/opc-storage-client/src/lib.rs
// ============================================================================
// Module: OPC Storage Client
// Description: Client for the provider's cookie-authenticated storage API.
// Purpose: Construct validated clients and send session-carrying requests.
// Dependencies: reqwest, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! This crate exposes [`ClientConfig`] and [`StorageClient`]. A client is built
//! from a fully populated configuration, logs in against the provider's
//! `/authenticate/` endpoint, and forwards raw requests with the issued session
//! cookie attached.
//! Invariants:
//! - Construction validates every required field and the endpoint address.
//! - Errors are reported through [`ClientError`]; nothing is retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::AUTHENTICATE_PATH;
pub use client::DEFAULT_USER_AGENT;
pub use client::StorageClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use reqwest::Method;
