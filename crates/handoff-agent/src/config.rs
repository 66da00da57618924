//! Provider configuration.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `OPENAI_API_KEY` | bearer token | required |
//! | `OPENAI_BASE_URL` | API base URL | `https://api.openai.com/v1` |
//! | `HANDOFF_HTTP_TIMEOUT_SECS` | request timeout in seconds | none |

use handoff_core::error::ConfigError;
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "HANDOFF_HTTP_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for the default endpoint with no timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: None,
        }
    }

    /// Load the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_env_string(API_KEY_ENV_VAR).ok_or_else(|| ConfigError::MissingEnvVar {
            key: API_KEY_ENV_VAR.to_string(),
        })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = get_env_string(BASE_URL_ENV_VAR) {
            config = config.with_base_url(&base_url).map_err(|message| {
                ConfigError::InvalidEnvVar {
                    key: BASE_URL_ENV_VAR.to_string(),
                    message,
                }
            })?;
        }
        if let Some(secs) = get_env_u64(TIMEOUT_ENV_VAR)? {
            if secs == 0 {
                return Err(ConfigError::InvalidEnvVar {
                    key: TIMEOUT_ENV_VAR.to_string(),
                    message: "timeout must be greater than zero".to_string(),
                });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Use another base URL, e.g. a proxy or a local model server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, String> {
        let url = Url::parse(base_url).map_err(|e| format!("invalid URL '{base_url}': {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "unsupported scheme '{}', expected http or https",
                url.scheme()
            ));
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        ))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn get_env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match get_env_string(key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}
