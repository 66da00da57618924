//! Orchestrator and client configuration loaded from the environment

use handoff_agent::config::{API_KEY_ENV_VAR, BASE_URL_ENV_VAR, TIMEOUT_ENV_VAR};
use handoff_agent::{ClientConfig, Orchestrator};
use handoff_testing::fixtures;
use handoff_tools::SCOPE_ENV_VAR;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn set_env(key: &str, value: &str) {
    unsafe {
        env::set_var(key, value);
    }
}

fn clear_env(key: &str) {
    unsafe {
        env::remove_var(key);
    }
}

fn clear_all_handoff_env_vars() {
    for key in [SCOPE_ENV_VAR, API_KEY_ENV_VAR, BASE_URL_ENV_VAR, TIMEOUT_ENV_VAR] {
        clear_env(key);
    }
}

#[test]
#[serial]
fn test_from_env_without_api_key() {
    clear_all_handoff_env_vars();
    set_env(SCOPE_ENV_VAR, fixtures::SCOPE);

    let err = Orchestrator::from_env(&fixtures::catalog()).unwrap_err();
    assert_eq!(err.error_code(), "MISSING_ENV_VAR");
    assert!(err.to_string().contains(API_KEY_ENV_VAR));

    clear_all_handoff_env_vars();
}

#[test]
#[serial]
fn test_from_env_without_scope() {
    clear_all_handoff_env_vars();
    set_env(API_KEY_ENV_VAR, "sk-test");

    let err = Orchestrator::from_env(&fixtures::catalog()).unwrap_err();
    assert_eq!(err.error_code(), "MISSING_SEARCH_SCOPE");

    clear_all_handoff_env_vars();
}

#[test]
#[serial]
fn test_from_env_builds_registry_from_scope() {
    clear_all_handoff_env_vars();
    set_env(SCOPE_ENV_VAR, fixtures::SCOPE);
    set_env(API_KEY_ENV_VAR, "sk-test");

    let orchestrator = Orchestrator::from_env(&fixtures::catalog()).expect("valid environment");
    assert_eq!(orchestrator.registry().scope(), fixtures::SCOPE);
    assert_eq!(orchestrator.registry().coordinator().name(), "Coordinator");

    clear_all_handoff_env_vars();
}

#[test]
#[serial]
fn test_client_config_overrides() {
    clear_all_handoff_env_vars();
    set_env(API_KEY_ENV_VAR, "sk-test");
    set_env(BASE_URL_ENV_VAR, "http://localhost:11434/v1");
    set_env(TIMEOUT_ENV_VAR, "30");

    let config = ClientConfig::from_env().expect("valid environment");
    assert_eq!(config.base_url().as_str(), "http://localhost:11434/v1");
    assert_eq!(config.timeout(), Some(Duration::from_secs(30)));

    clear_all_handoff_env_vars();
}

#[test]
#[serial]
fn test_zero_timeout_rejected() {
    clear_all_handoff_env_vars();
    set_env(API_KEY_ENV_VAR, "sk-test");
    set_env(TIMEOUT_ENV_VAR, "0");

    let err = ClientConfig::from_env().unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ENV_VAR");

    clear_all_handoff_env_vars();
}
