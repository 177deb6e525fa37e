//! Config resolution tests for opc-storage-testing.
// crates/opc-storage-testing/tests/config_resolution.rs
// =============================================================================
// Module: Config Resolution Tests
// Description: Environment fallback, precedence, and client construction.
// Purpose: Ensure explicit values win and gaps resolve deterministically.
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

use std::time::Duration;
use std::time::Instant;

use opc_storage_client::ClientConfig;
use opc_storage_client::ClientError;
use opc_storage_testing::Env;
use opc_storage_testing::StaticEnv;
use opc_storage_testing::TestSupportError;
use opc_storage_testing::TransportSettings;
use opc_storage_testing::resolve;
use opc_storage_testing::resolve_credentials;
use opc_storage_testing::resolver::HANDSHAKE_TIMEOUT;
use opc_storage_testing::resolver::IDENTITY_DOMAIN_ENV;
use opc_storage_testing::resolver::PASSWORD_ENV;
use opc_storage_testing::resolver::USERNAME_ENV;
use opc_storage_testing::resolver::default_transport;
use opc_storage_testing::storage_test_client;
use url::Url;

type TestResult = Result<(), String>;

/// Environment carrying all three credential variables.
fn full_env() -> StaticEnv {
    StaticEnv::from_iter([
        (IDENTITY_DOMAIN_ENV, "env-domain"),
        (USERNAME_ENV, "env-user"),
        (PASSWORD_ENV, "env-pass"),
    ])
}

#[test]
fn unset_fields_with_absent_env_resolve_to_empty_strings() {
    let mut config = ClientConfig::new();
    resolve_credentials(&mut config, &StaticEnv::new());

    assert_eq!(config.identity_domain.as_deref(), Some(""));
    assert_eq!(config.username.as_deref(), Some(""));
    assert_eq!(config.password.as_deref(), Some(""));
}

#[test]
fn unset_fields_take_env_values() {
    let mut config = ClientConfig::new();
    resolve_credentials(&mut config, &full_env());

    assert_eq!(config.identity_domain.as_deref(), Some("env-domain"));
    assert_eq!(config.username.as_deref(), Some("env-user"));
    assert_eq!(config.password.as_deref(), Some("env-pass"));
}

#[test]
fn explicit_values_are_never_overwritten() {
    let mut config = ClientConfig::new()
        .with_identity_domain("explicit-domain")
        .with_username("")
        .with_password("explicit-pass");
    resolve_credentials(&mut config, &full_env());

    assert_eq!(config.identity_domain.as_deref(), Some("explicit-domain"));
    assert_eq!(config.username.as_deref(), Some(""), "explicit empty string must survive");
    assert_eq!(config.password.as_deref(), Some("explicit-pass"));
}

#[test]
fn env_names_are_case_sensitive() {
    let env = StaticEnv::new().with_var("opc_username", "lowercase");
    let mut config = ClientConfig::new();
    resolve_credentials(&mut config, &env);

    assert_eq!(config.username.as_deref(), Some(""));
}

#[test]
fn static_env_reports_only_configured_keys() {
    let env = StaticEnv::new().with_var(PASSWORD_ENV, "a").with_var(PASSWORD_ENV, "b");
    assert_eq!(env.var(PASSWORD_ENV).as_deref(), Some("b"));
    assert_eq!(env.var(USERNAME_ENV), None);
}

#[test]
fn resolve_synthesizes_transport_when_absent() -> TestResult {
    let config = resolve(ClientConfig::new(), &StaticEnv::new()).map_err(|err| err.to_string())?;
    if config.http_client.is_none() {
        return Err("transport was not synthesized".to_string());
    }
    Ok(())
}

#[test]
fn default_transport_settings_use_handshake_timeout() {
    assert_eq!(HANDSHAKE_TIMEOUT, Duration::from_secs(120));
    assert_eq!(TransportSettings::default().connect_timeout, HANDSHAKE_TIMEOUT);
    assert!(default_transport().is_ok());
}

#[test]
fn transport_settings_bound_connection_attempts() {
    let settings = TransportSettings {
        connect_timeout: Duration::from_millis(200),
    };
    let client = settings.build().unwrap();

    // Non-routable address: the connect either times out or fails outright.
    let started = Instant::now();
    let _ = client.get("http://10.255.255.1:81/").send();
    assert!(started.elapsed() < Duration::from_secs(10), "connect timeout was not applied");
}

#[test]
fn storage_test_client_uses_resolved_values() {
    let config = ClientConfig::new()
        .with_username("explicit-user")
        .with_api_endpoint(Url::parse("http://127.0.0.1:9").unwrap());
    let client = storage_test_client(config, &full_env()).unwrap();

    assert_eq!(client.identity_domain(), "env-domain");
    assert_eq!(client.username(), "explicit-user");
    assert_eq!(client.api_endpoint().as_str(), "http://127.0.0.1:9/");
}

#[test]
fn storage_test_client_propagates_construction_errors_unchanged() {
    let err = storage_test_client(ClientConfig::new(), &StaticEnv::new()).unwrap_err();
    let expected = ClientError::MissingField("api_endpoint").to_string();

    assert_eq!(err.to_string(), expected);
    match err {
        TestSupportError::Client(ClientError::MissingField(field)) => {
            assert_eq!(field, "api_endpoint");
        }
        other => panic!("expected client error, got {other:?}"),
    }
}

#[test]
fn storage_test_client_rejects_unusable_endpoint() {
    let config = ClientConfig::new().with_api_endpoint(Url::parse("mailto:ops@example.com").unwrap());
    let err = storage_test_client(config, &StaticEnv::new()).unwrap_err();

    assert!(
        matches!(err, TestSupportError::Client(ClientError::InvalidEndpoint(_))),
        "unexpected error: {err}"
    );
}
