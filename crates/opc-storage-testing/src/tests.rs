// crates/opc-storage-testing/src/tests.rs
// ============================================================================
// Module: Test Support Unit Tests
// Description: Response building and routing without sockets.
// Purpose: Allow panic-based assertions and cover in-process dispatch.
// Dependencies: opc-storage-testing, tiny_http
// ============================================================================

//! ## Overview
//! Test-only lint relaxations plus unit tests for response construction and
//! router dispatch driven by `tiny_http::TestRequest`.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::json;
use tiny_http::Method;
use tiny_http::Request;
use tiny_http::TestRequest;

use crate::env::StaticEnv;
use crate::log::DEBUG_LOG_ENV;
use crate::log::NoopRequestLog;
use crate::log::RequestLog;
use crate::log::StderrRequestLog;
use crate::log::debug_logging_enabled;
use crate::log::request_log_from_env;
use crate::server::Route;
use crate::server::Router;
use crate::server::StubResponse;
use crate::server::session_cookie_response;

/// Builds an in-memory request for `method` and `path`.
fn request(method: Method, path: &str) -> Request {
    TestRequest::new().with_method(method).with_path(path).into()
}

// ============================================================================
// SECTION: Responses
// ============================================================================

#[test]
fn session_cookie_value_is_quoted() {
    let response = session_cookie_response();
    assert_eq!(response.status(), 200);
    assert_eq!(response.header("set-cookie"), Some("testAuthCookie=\"cookie value\""));
    assert!(response.body().is_empty());
}

#[test]
fn json_response_sets_content_type() {
    let response = StubResponse::json(201, &json!({"name": "c1"}));
    assert_eq!(response.status(), 201);
    assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
    assert_eq!(response.body(), br#"{"name":"c1"}"#);
}

// ============================================================================
// SECTION: Routing
// ============================================================================

#[test]
fn authenticating_router_orders_intercept_before_delegate() {
    let router = Router::authenticating(|_request: &mut Request| StubResponse::empty(418));
    let routes = router.routes();
    assert_eq!(routes.len(), 2);
    assert!(matches!(routes[0], Route::Intercept { .. }));
    assert!(matches!(routes[1], Route::Delegate(_)));
}

#[test]
fn dispatch_strips_query_before_matching() {
    let router = Router::authenticating(|_request: &mut Request| StubResponse::empty(418));

    let mut login = request(Method::Get, "/authenticate/?retry=1");
    assert!(router.dispatch(&mut login).header("Set-Cookie").is_some());

    let mut other = request(Method::Get, "/v1/foo?retry=1");
    let response = router.dispatch(&mut other);
    assert_eq!(response.status(), 418);
    assert_eq!(response.header("Set-Cookie"), None);
}

#[test]
fn empty_router_answers_not_found() {
    let mut req = request(Method::Delete, "/v1/foo");
    assert_eq!(Router::new().dispatch(&mut req).status(), 404);
}

// ============================================================================
// SECTION: Request Logging
// ============================================================================

#[test]
fn debug_flag_absent_selects_silent_sink() {
    let env = StaticEnv::new();
    assert!(!debug_logging_enabled(&env));
    assert!(!request_log_from_env(&env).is_enabled());
}

#[test]
fn debug_flag_present_but_empty_selects_silent_sink() {
    let env = StaticEnv::new().with_var(DEBUG_LOG_ENV, "");
    assert!(!debug_logging_enabled(&env));
    assert!(!request_log_from_env(&env).is_enabled());
}

#[test]
fn debug_flag_non_empty_selects_stderr_sink() {
    for value in ["1", "true", "0"] {
        let env = StaticEnv::new().with_var(DEBUG_LOG_ENV, value);
        assert!(debug_logging_enabled(&env), "flag value {value:?}");
        assert!(request_log_from_env(&env).is_enabled(), "flag value {value:?}");
    }
}

#[test]
fn debug_flag_name_is_case_sensitive() {
    let env = StaticEnv::new().with_var("oracle_log", "1");
    assert!(!debug_logging_enabled(&env));
}

#[test]
fn sinks_report_whether_they_record() {
    assert!(StderrRequestLog.is_enabled());
    assert!(!NoopRequestLog.is_enabled());
}
