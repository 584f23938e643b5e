// Fallback controller.
//
// Runs an operation against its primary endpoint and, for failures that a
// different endpoint might not share, once more against the fallback. It
// always ends in `Outcome::Success` or `Outcome::Aborted`; nothing is thrown
// past this point.

use std::io::Write;

use serde_json::Value;
use tracing::{debug, info};

use crate::api::Executor;
use crate::attempt::{AttemptResult, Failure};
use crate::config::Endpoints;
use crate::operation::Operation;

/// Which endpoint produced a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Primary,
    Fallback,
}

/// Why an operation gave up.
#[derive(Debug, Clone)]
pub enum Abort {
    /// The primary failed and there is no fallback configured.
    NoFallback(Failure),
    /// The primary rejected the request; retrying elsewhere cannot help.
    Rejected(Failure),
    /// The primary failed, the fallback was tried and failed too.
    FallbackFailed { primary: Failure, fallback: Failure },
}

/// Terminal state of one invocation.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success { body: Value, source: Source },
    Aborted(Abort),
}

/// Drive the primary/fallback state machine for `operation`.
///
/// `notices` is the side channel for progress messages (stderr in the
/// binary). Writing to it is best effort: a broken stderr must not turn a
/// successful fallback into a failure.
pub fn run<E, W>(
    executor: &E,
    operation: &Operation,
    endpoints: &Endpoints<'_>,
    notices: &mut W,
) -> Outcome
where
    E: Executor + ?Sized,
    W: Write + ?Sized,
{
    let method = operation.method();
    let payload = operation.payload();

    let primary = match executor.execute(method, endpoints.primary, &payload) {
        AttemptResult::Success { body, .. } => {
            return Outcome::Success {
                body,
                source: Source::Primary,
            }
        }
        AttemptResult::Failure(failure) => failure,
    };

    if !primary.kind.is_fallback_eligible() {
        debug!(status = ?primary.status, "primary rejected the request, not retrying");
        return Outcome::Aborted(Abort::Rejected(primary));
    }

    let Some(fallback_url) = endpoints.fallback else {
        debug!(kind = %primary.kind, "primary failed and no fallback is configured");
        return Outcome::Aborted(Abort::NoFallback(primary));
    };

    info!(kind = %primary.kind, fallback = fallback_url, "primary endpoint failed");
    if let Err(err) = writeln!(
        notices,
        "Primary endpoint returned {}, retrying with fallback: {}",
        primary.status_label(),
        fallback_url
    ) {
        debug!(error = %err, "could not write fallback notice");
    }

    match executor.execute(method, fallback_url, &payload) {
        AttemptResult::Success { body, .. } => Outcome::Success {
            body,
            source: Source::Fallback,
        },
        AttemptResult::Failure(fallback) => {
            Outcome::Aborted(Abort::FallbackFailed { primary, fallback })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::FailureKind;
    use crate::operation::{Method, OrderPayload, Payload};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;

    /// A side channel that rejects every write.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Hands out pre-recorded results in order and remembers every URL hit.
    struct Scripted {
        results: RefCell<VecDeque<AttemptResult>>,
        calls: RefCell<Vec<(Method, String, Payload)>>,
    }

    impl Scripted {
        fn new(results: Vec<AttemptResult>) -> Self {
            Scripted {
                results: RefCell::new(results.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(_, url, _)| url.clone()).collect()
        }
    }

    impl Executor for Scripted {
        fn execute(&self, method: Method, url: &str, payload: &Payload) -> AttemptResult {
            self.calls
                .borrow_mut()
                .push((method, url.to_string(), payload.clone()));
            self.results
                .borrow_mut()
                .pop_front()
                .expect("executor called more times than scripted")
        }
    }

    fn ok(body: Value) -> AttemptResult {
        AttemptResult::Success { status: 200, body }
    }

    fn failed(kind: FailureKind, status: Option<u16>) -> AttemptResult {
        AttemptResult::Failure(Failure {
            kind,
            status,
            body: Some("oops".into()),
            detail: format!("{:?}", status),
        })
    }

    fn create() -> Operation {
        Operation::CreateOrder(OrderPayload {
            pizza_type: "Margherita".into(),
            size: "Large".into(),
            quantity: 2,
            customer_name: "Test User".into(),
            delivery_address: "123 Main St".into(),
            phone_number: "555-0123".into(),
        })
    }

    const WITH_FALLBACK: Endpoints<'static> = Endpoints {
        primary: "http://primary",
        fallback: Some("http://fallback"),
    };

    #[test]
    fn primary_success_is_terminal() {
        let exec = Scripted::new(vec![ok(json!({"id": 1}))]);
        let mut notices = Vec::new();

        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut notices);

        match outcome {
            Outcome::Success { body, source } => {
                assert_eq!(body, json!({"id": 1}));
                assert_eq!(source, Source::Primary);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(exec.urls(), vec!["http://primary"]);
        assert!(notices.is_empty());
    }

    #[test]
    fn no_response_falls_back_with_notice() {
        let exec = Scripted::new(vec![
            failed(FailureKind::NoResponse, None),
            ok(json!({"from": "fallback"})),
        ]);
        let mut notices = Vec::new();

        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut notices);

        assert!(matches!(
            outcome,
            Outcome::Success { source: Source::Fallback, .. }
        ));
        assert_eq!(exec.urls(), vec!["http://primary", "http://fallback"]);
        let notices = String::from_utf8(notices).unwrap();
        assert_eq!(
            notices,
            "Primary endpoint returned no response, retrying with fallback: http://fallback\n"
        );
    }

    #[test]
    fn fallback_reuses_method_and_payload() {
        let exec = Scripted::new(vec![
            failed(FailureKind::ServerError, Some(500)),
            ok(json!({})),
        ]);
        run(&exec, &create(), &WITH_FALLBACK, &mut Vec::new());

        let calls = exec.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, Method::Post);
        assert_eq!(calls[1].0, Method::Post);
        assert_eq!(calls[0].2, calls[1].2);
    }

    #[test]
    fn server_error_notice_names_status() {
        let exec = Scripted::new(vec![
            failed(FailureKind::ServerError, Some(502)),
            ok(json!({})),
        ]);
        let mut notices = Vec::new();
        run(&exec, &create(), &WITH_FALLBACK, &mut notices);

        let notices = String::from_utf8(notices).unwrap();
        assert!(notices.starts_with("Primary endpoint returned 502, retrying with fallback"));
    }

    #[test]
    fn invalid_response_falls_back() {
        let exec = Scripted::new(vec![
            failed(FailureKind::InvalidResponse, Some(200)),
            ok(json!({"ok": true})),
        ]);
        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut Vec::new());
        assert!(matches!(
            outcome,
            Outcome::Success { source: Source::Fallback, .. }
        ));
    }

    #[test]
    fn client_error_never_touches_fallback() {
        let exec = Scripted::new(vec![failed(FailureKind::ClientError, Some(400))]);
        let mut notices = Vec::new();

        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut notices);

        match outcome {
            Outcome::Aborted(Abort::Rejected(failure)) => {
                assert_eq!(failure.status, Some(400));
                assert_eq!(failure.body.as_deref(), Some("oops"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(exec.urls(), vec!["http://primary"]);
        assert!(notices.is_empty());
    }

    #[test]
    fn menu_without_fallback_aborts_after_one_attempt() {
        let exec = Scripted::new(vec![failed(FailureKind::NoResponse, None)]);
        let endpoints = Endpoints {
            primary: "http://menu",
            fallback: None,
        };
        let mut notices = Vec::new();

        let outcome = run(&exec, &Operation::FetchMenu, &endpoints, &mut notices);

        assert!(matches!(outcome, Outcome::Aborted(Abort::NoFallback(_))));
        assert_eq!(exec.urls(), vec!["http://menu"]);
        assert!(notices.is_empty());
    }

    #[test]
    fn fallback_failure_is_terminal() {
        let exec = Scripted::new(vec![
            failed(FailureKind::ServerError, Some(500)),
            failed(FailureKind::ServerError, Some(503)),
        ]);

        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut Vec::new());

        match outcome {
            Outcome::Aborted(Abort::FallbackFailed { primary, fallback }) => {
                assert_eq!(primary.status, Some(500));
                assert_eq!(fallback.status, Some(503));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(exec.calls.borrow().len(), 2);
    }

    #[test]
    fn fallback_client_error_also_aborts() {
        let exec = Scripted::new(vec![
            failed(FailureKind::NoResponse, None),
            failed(FailureKind::ClientError, Some(404)),
        ]);
        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut Vec::new());
        assert!(matches!(
            outcome,
            Outcome::Aborted(Abort::FallbackFailed { .. })
        ));
    }

    #[test]
    fn unwritable_notice_does_not_block_fallback() {
        let exec = Scripted::new(vec![
            failed(FailureKind::NoResponse, None),
            ok(json!({"from": "fallback"})),
        ]);

        let outcome = run(&exec, &create(), &WITH_FALLBACK, &mut ClosedPipe);

        match outcome {
            Outcome::Success { body, source } => {
                assert_eq!(body, json!({"from": "fallback"}));
                assert_eq!(source, Source::Fallback);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(exec.urls(), vec!["http://primary", "http://fallback"]);
    }
}
