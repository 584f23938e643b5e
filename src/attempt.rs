// Attempt outcomes: what one HTTP request/response cycle produced.
// The fallback controller only ever looks at these values; it never sees
// a reqwest error directly.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// How a failed attempt went wrong. Derived only from what the attempt
/// observed (transport error, status code, body parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection refused, DNS failure, malformed URL or timeout.
    NoResponse,
    /// Status >= 500.
    ServerError,
    /// Status in [400, 500).
    ClientError,
    /// Status < 400 but the body is not JSON.
    InvalidResponse,
}

impl FailureKind {
    /// Classify a status code that reqwest did not treat as a transport
    /// error. Returns `None` for statuses below 400.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            500..=u16::MAX => Some(FailureKind::ServerError),
            400..=499 => Some(FailureKind::ClientError),
            _ => None,
        }
    }

    /// Whether a second endpoint might plausibly succeed where this one
    /// failed. Client errors are deterministic, so they are not.
    pub fn is_fallback_eligible(self) -> bool {
        !matches!(self, FailureKind::ClientError)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::NoResponse => "no response",
            FailureKind::ServerError => "server error",
            FailureKind::ClientError => "client error",
            FailureKind::InvalidResponse => "invalid response",
        };
        f.write_str(name)
    }
}

/// A failed attempt, carrying whatever the server sent back.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct Failure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub detail: String,
}

impl Failure {
    pub fn no_response(detail: impl Into<String>) -> Self {
        Failure {
            kind: FailureKind::NoResponse,
            status: None,
            body: None,
            detail: detail.into(),
        }
    }

    /// Status line used in the fallback notice: the code, or "no response".
    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "no response".to_string(),
        }
    }
}

/// Outcome of exactly one attempt against one URL.
#[derive(Debug, Clone)]
pub enum AttemptResult {
    Success { status: u16, body: Value },
    Failure(Failure),
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Success { .. })
    }
}
