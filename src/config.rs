// Configuration and endpoint resolution.
//
// A `Config` is built once when the process starts (normally from the
// environment) and handed to whatever needs URLs. Nothing reads the
// environment after that.

use std::time::Duration;

use crate::error::ConfigError;
use crate::operation::Operation;

pub const MENU_URL_VAR: &str = "SIM_MENU_URL";
pub const CREATE_URL_VAR: &str = "SIM_CREATE_URL";
pub const STATUS_URL_VAR: &str = "SIM_STATUS_URL";
pub const FALLBACK_CREATE_VAR: &str = "SIM_FALLBACK_CREATE";
pub const FALLBACK_STATUS_VAR: &str = "SIM_FALLBACK_STATUS";
pub const TIMEOUT_VAR: &str = "SIM_TIMEOUT_SECS";

pub const DEFAULT_MENU_URL: &str = "https://gist.githubusercontent.com/Pradeepkarra1/770ee94f47281b8c952b744d3889ea00/raw/a6bdb41b0c7e1bda15c63ab8e7eb73dc9213b441/pizza_menu.json";
pub const DEFAULT_CREATE_URL: &str = "https://httpbin.org/post";
pub const DEFAULT_STATUS_URL: &str = "https://httpbin.org/get";
pub const DEFAULT_FALLBACK_CREATE: &str = "https://postman-echo.com/post";
pub const DEFAULT_FALLBACK_STATUS: &str = "https://postman-echo.com/get";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// URLs and timeout for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub menu_url: String,
    pub create_url: String,
    pub status_url: String,
    pub fallback_create_url: String,
    pub fallback_status_url: String,
    pub timeout: Duration,
}

/// Primary and optional fallback URL for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints<'a> {
    pub primary: &'a str,
    pub fallback: Option<&'a str>,
}

impl Config {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let timeout = match lookup(TIMEOUT_VAR).filter(|v| !v.is_empty()) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: TIMEOUT_VAR,
                        value: raw,
                    })
                }
            },
        };

        Ok(Config {
            menu_url: get(MENU_URL_VAR, DEFAULT_MENU_URL),
            create_url: get(CREATE_URL_VAR, DEFAULT_CREATE_URL),
            status_url: get(STATUS_URL_VAR, DEFAULT_STATUS_URL),
            fallback_create_url: get(FALLBACK_CREATE_VAR, DEFAULT_FALLBACK_CREATE),
            fallback_status_url: get(FALLBACK_STATUS_VAR, DEFAULT_FALLBACK_STATUS),
            timeout,
        })
    }

    /// Resolve the endpoints for an operation. The menu has no fallback.
    /// URLs are returned as configured; a bad one fails at request time.
    pub fn endpoints(&self, operation: &Operation) -> Endpoints<'_> {
        match operation {
            Operation::FetchMenu => Endpoints {
                primary: &self.menu_url,
                fallback: None,
            },
            Operation::CreateOrder(_) => Endpoints {
                primary: &self.create_url,
                fallback: Some(&self.fallback_create_url),
            },
            Operation::CheckStatus { .. } => Endpoints {
                primary: &self.status_url,
                fallback: Some(&self.fallback_status_url),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            menu_url: DEFAULT_MENU_URL.to_string(),
            create_url: DEFAULT_CREATE_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            fallback_create_url: DEFAULT_FALLBACK_CREATE.to_string(),
            fallback_status_url: DEFAULT_FALLBACK_STATUS.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
