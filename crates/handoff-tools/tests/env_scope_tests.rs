//! Search scope taken from the environment

use handoff_tools::{AgentCatalog, AgentDeclaration, CapabilityRegistry, SCOPE_ENV_VAR};
use serial_test::serial;
use std::env;

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

struct Front;

fn catalog() -> AgentCatalog {
    AgentCatalog::new()
        .with(
            AgentDeclaration::coordinator::<Front>("Front", "env::agents")
                .construct_with(|| Ok(Front))
                .build(),
        )
        .expect("single declaration")
}

#[test]
#[serial]
fn test_scope_read_from_env_when_not_given() {
    set_env(SCOPE_ENV_VAR, "env::agents");

    let registry = CapabilityRegistry::build(&catalog(), None).expect("scope from env");
    assert_eq!(registry.scope(), "env::agents");
    assert_eq!(registry.coordinator().name(), "Front");

    clear_env(SCOPE_ENV_VAR);
}

#[test]
#[serial]
fn test_explicit_scope_wins_over_env() {
    set_env(SCOPE_ENV_VAR, "somewhere::else");

    let registry = CapabilityRegistry::build(&catalog(), Some("env")).expect("explicit scope");
    assert_eq!(registry.scope(), "env");

    clear_env(SCOPE_ENV_VAR);
}

#[test]
#[serial]
fn test_unset_scope_is_fatal() {
    clear_env(SCOPE_ENV_VAR);

    let err = CapabilityRegistry::build(&catalog(), None).unwrap_err();
    assert!(err.is_config());
    assert_eq!(err.error_code(), "MISSING_SEARCH_SCOPE");
}

#[test]
#[serial]
fn test_blank_env_scope_is_fatal() {
    set_env(SCOPE_ENV_VAR, "   ");

    let err = CapabilityRegistry::build(&catalog(), None).unwrap_err();
    assert_eq!(err.error_code(), "MISSING_SEARCH_SCOPE");

    clear_env(SCOPE_ENV_VAR);
}
