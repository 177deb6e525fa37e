// crates/opc-storage-testing/src/log.rs
// ============================================================================
// Module: Request Log
// Description: Diagnostic sinks for requests received by test doubles.
// Purpose: Let failing tests see what the client actually sent.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Test doubles report each received request to a [`RequestLog`]. Logging is
//! best-effort: sinks swallow their own write failures and never influence the
//! response sent to the client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::env::Env;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment flag enabling request logging when set to a non-empty value.
pub const DEBUG_LOG_ENV: &str = "ORACLE_LOG";

// ============================================================================
// SECTION: Events
// ============================================================================

/// A request observed by a test double.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLogEvent {
    /// Event label.
    pub event: &'static str,
    /// HTTP method.
    pub method: String,
    /// Request target as received (path and query).
    pub url: String,
}

impl RequestLogEvent {
    /// Creates a request event.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            event: "stub_request",
            method: method.into(),
            url: url.into(),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink for request diagnostics.
pub trait RequestLog: Send + Sync {
    /// Records a received request.
    fn record(&self, event: &RequestLogEvent);

    /// Returns false for sinks that discard everything.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Sink that writes JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrRequestLog;

impl RequestLog for StderrRequestLog {
    fn record(&self, event: &RequestLogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRequestLog;

impl RequestLog for NoopRequestLog {
    fn record(&self, _event: &RequestLogEvent) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Returns true when [`DEBUG_LOG_ENV`] is present and non-empty.
#[must_use]
pub fn debug_logging_enabled(env: &dyn Env) -> bool {
    env.var(DEBUG_LOG_ENV).is_some_and(|flag| !flag.is_empty())
}

/// Selects the stderr sink when [`debug_logging_enabled`] holds.
#[must_use]
pub fn request_log_from_env(env: &dyn Env) -> Arc<dyn RequestLog> {
    if debug_logging_enabled(env) { Arc::new(StderrRequestLog) } else { Arc::new(NoopRequestLog) }
}
