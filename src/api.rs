// API client module: a small blocking HTTP client that performs exactly one
// request per call and reports what happened as an `AttemptResult`. It never
// retries; deciding what to do after a failure is the fallback controller's
// job.

use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::attempt::{AttemptResult, Failure, FailureKind};
use crate::operation::{Method, Payload};

/// Anything that can perform a single attempt. `ApiClient` is the real
/// implementation; tests script their own. The per-attempt timeout belongs
/// to the implementor, so primary and fallback attempts share it.
pub trait Executor {
    fn execute(&self, method: Method, url: &str, payload: &Payload) -> AttemptResult;
}

/// Blocking reqwest client with a fixed per-attempt timeout.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    timeout: Duration,
    progress: bool,
}

impl ApiClient {
    /// Build a client whose every request (connect, send, read body) is
    /// bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pizza-sim/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            timeout,
            progress: false,
        })
    }

    /// Show a spinner on stderr while a request is in flight. indicatif
    /// keeps it hidden when stderr is not a terminal.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spinner(&self, method: Method, url: &str) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("{} {}", method.as_str(), url));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }

    fn send(&self, method: Method, url: &str, payload: &Payload) -> reqwest::Result<Response> {
        let mut req = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        match payload {
            Payload::None => {}
            Payload::Query(pairs) => req = req.query(pairs),
            Payload::Json(body) => req = req.json(body),
        }
        req.send()
    }
}

impl Executor for ApiClient {
    fn execute(&self, method: Method, url: &str, payload: &Payload) -> AttemptResult {
        debug!(method = method.as_str(), url, "sending request");

        let spinner = self.spinner(method, url);
        let result = self.send(method, url, payload);
        let attempt = match result {
            Ok(res) => read_response(res, url),
            Err(err) => {
                debug!(url, error = %err, "request failed without a response");
                AttemptResult::Failure(Failure::no_response(err.to_string()))
            }
        };
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        attempt
    }
}

/// Turn a received response into an attempt outcome. Error statuses keep
/// their body for diagnostics; success statuses must carry JSON.
fn read_response(res: Response, url: &str) -> AttemptResult {
    let status = res.status();
    let code = status.as_u16();
    debug!(url, status = code, "response received");

    if let Some(kind) = FailureKind::from_status(code) {
        let body = res.text().ok();
        return AttemptResult::Failure(Failure {
            kind,
            status: Some(code),
            body,
            detail: format!("{} for url: {}", status, url),
        });
    }

    let text = match res.text() {
        Ok(text) => text,
        Err(err) => return AttemptResult::Failure(Failure::no_response(err.to_string())),
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(body) => AttemptResult::Success { status: code, body },
        Err(err) => AttemptResult::Failure(Failure {
            kind: FailureKind::InvalidResponse,
            status: Some(code),
            body: Some(text),
            detail: format!("invalid JSON in response from {}: {}", url, err),
        }),
    }
}
