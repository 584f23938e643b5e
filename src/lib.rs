// Library root
// -----------
// This crate exposes the simulator's pieces as a library so they can be
// tested without spawning the binary. `main.rs` parses the command line,
// builds a `Config` and an `ApiClient`, then hands over to `run`.
//
// Module responsibilities:
// - `config`: endpoint URLs and timeout, with defaults and env overrides.
// - `operation`: the three operations and the request each one sends.
// - `api`: one blocking HTTP attempt, classified into an `AttemptResult`.
// - `attempt`: attempt outcomes and failure classification.
// - `fallback`: the primary/fallback state machine.
// - `output`: stdout/stderr rendering and exit codes.
// - `cli`: clap definitions.
pub mod api;
pub mod attempt;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod operation;
pub mod output;

use std::io::{self, Write};

use tracing::debug;

use crate::api::Executor;
use crate::config::Config;
use crate::fallback::Outcome;
use crate::operation::Operation;

/// Perform `operation` end to end and return the exit code. Only failing
/// writes to `stdout`/`stderr` surface as errors.
pub fn run<E, O, W>(
    operation: &Operation,
    config: &Config,
    executor: &E,
    stdout: &mut O,
    stderr: &mut W,
) -> io::Result<u8>
where
    E: Executor + ?Sized,
    O: Write + ?Sized,
    W: Write + ?Sized,
{
    let endpoints = config.endpoints(operation);
    debug!(
        primary = endpoints.primary,
        fallback = ?endpoints.fallback,
        "resolved endpoints"
    );

    let outcome = fallback::run(executor, operation, &endpoints, &mut *stderr);
    if let Outcome::Success { source, .. } = &outcome {
        debug!(?source, "operation succeeded");
    }
    output::report(operation, outcome, stdout, stderr)
}
