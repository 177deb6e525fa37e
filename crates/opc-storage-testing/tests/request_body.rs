//! Request body decoding tests for opc-storage-testing.
// crates/opc-storage-testing/tests/request_body.rs
// =============================================================================
// Module: Request Body Decoding Tests
// Description: JSON decoding of captured request bodies.
// Purpose: Ensure malformed payloads fail the test instead of half-decoding.
// =============================================================================

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

use opc_storage_testing::BodyError;
use opc_storage_testing::Request;
use opc_storage_testing::decode_request_body;
use opc_storage_testing::try_decode_request_body;
use serde::Deserialize;
use tiny_http::Method;
use tiny_http::TestRequest;

/// Minimal numeric payload.
#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Numeric {
    /// Numeric field.
    a: i64,
}

/// Builds a POST request carrying `body`.
fn post(body: &'static str) -> Request {
    TestRequest::new().with_method(Method::Post).with_path("/v1/foo").with_body(body).into()
}

#[test]
fn decodes_numeric_field() {
    let mut request = post(r#"{"a":1}"#);
    let decoded: Numeric = decode_request_body(&mut request);
    assert_eq!(decoded, Numeric { a: 1 });
}

#[test]
#[should_panic(expected = "error unmarshalling request body")]
fn type_mismatch_fails_the_test() {
    let mut request = post(r#"{"a":"x"}"#);
    let _decoded: Numeric = decode_request_body(&mut request);
}

#[test]
#[should_panic(expected = "error unmarshalling request body")]
fn empty_body_fails_the_test() {
    let mut request = post("");
    let _decoded: Numeric = decode_request_body(&mut request);
}

#[test]
fn try_decode_reports_decode_errors() {
    let mut request = post(r#"{"a":"x"}"#);
    let result: Result<Numeric, BodyError> = try_decode_request_body(&mut request);
    assert!(matches!(result, Err(BodyError::Decode(_))), "unexpected result: {result:?}");
}

#[test]
fn body_is_consumed_by_first_decode() {
    let mut request = post(r#"{"a":7}"#);
    let first: Numeric = decode_request_body(&mut request);
    assert_eq!(first.a, 7);

    let second: Result<Numeric, BodyError> = try_decode_request_body(&mut request);
    assert!(matches!(second, Err(BodyError::Decode(_))), "body must not be readable twice");
}
