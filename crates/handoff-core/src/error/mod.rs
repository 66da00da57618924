//! Error Types
//!
//! This module defines the error types raised while building the capability
//! registry and while invoking capabilities. The errors are organized into
//! focused submodules:
//! - `config`: startup configuration failures (coordinator, search scope, construction)
//! - `registration`: capability registration failures (duplicates, context order, names)
//! - `invocation`: argument marshalling and capability execution failures

mod config;
mod invocation;
mod registration;

pub use config::ConfigError;
pub use invocation::{InvocationError, InvocationResult};
pub use registration::{RegistrationError, RegistryError, RegistryResult};

/// Boxed error produced by agent constructors and capability handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
