use thiserror::Error;

/// Errors raised while building the invocation's configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: expected a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}
