use std::time::Duration;

use thiserror::Error;

/// Backend used when `API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://backend-test:80";

/// Request timeout used when `API_TIMEOUT_SECS` is not set
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
    #[error("API_URL must not be empty")]
    EmptyUrl,
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing `/`
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Read `API_URL` and `API_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }

        let timeout = match lookup("API_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(Self { api_url, timeout })
    }

    /// Full URL of a backend route, e.g. `endpoint("move")`.
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.api_url, route.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
