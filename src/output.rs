// Output layer: turns a terminal outcome into what the user sees.
// Success bodies go to stdout as indented JSON, in one write, only once the
// result is final. Everything else goes to stderr.

use std::io::{self, Write};

use serde_json::Value;

use crate::attempt::Failure;
use crate::fallback::{Abort, Outcome};
use crate::operation::Operation;

/// Exit code for a successful invocation.
pub const EXIT_OK: u8 = 0;
/// Exit code for an aborted invocation (and for usage/config errors).
pub const EXIT_ABORTED: u8 = 2;

/// Write the outcome of `operation` and return the process exit code.
pub fn report<O, E>(
    operation: &Operation,
    outcome: Outcome,
    stdout: &mut O,
    stderr: &mut E,
) -> io::Result<u8>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    match outcome {
        Outcome::Success { body, .. } => {
            let view = match operation {
                Operation::FetchMenu => menu_view(body),
                _ => body,
            };
            write_json(&view, stdout)?;
            Ok(EXIT_OK)
        }
        Outcome::Aborted(abort) => {
            write_abort(operation, &abort, stderr)?;
            Ok(EXIT_ABORTED)
        }
    }
}

/// The menu endpoint may wrap the item list in a `menu` field or return
/// it directly.
pub fn menu_view(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("menu") => {
            map.remove("menu").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Pretty-print `value` with two-space indentation and a trailing newline.
pub fn write_json<W: Write + ?Sized>(value: &Value, out: &mut W) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{}", text)?;
    out.flush()
}

fn write_abort<W: Write + ?Sized>(
    operation: &Operation,
    abort: &Abort,
    err: &mut W,
) -> io::Result<()> {
    match abort {
        Abort::NoFallback(failure) => {
            writeln!(err, "Error {}: {}", operation.action(), failure)?;
        }
        Abort::Rejected(failure) => {
            write_rejected_body(failure, err)?;
            writeln!(err, "Error {}: {}", operation.action(), failure)?;
        }
        Abort::FallbackFailed { fallback, .. } => {
            writeln!(err, "Fallback also failed: {}", fallback)?;
        }
    }
    err.flush()
}

/// Show what the server said about a rejected request: formatted when it is
/// JSON, verbatim otherwise.
fn write_rejected_body<W: Write + ?Sized>(failure: &Failure, err: &mut W) -> io::Result<()> {
    let Some(body) = failure.body.as_deref().filter(|b| !b.trim().is_empty()) else {
        return Ok(());
    };
    match serde_json::from_str::<Value>(body) {
        Ok(value) => write_json(&value, err),
        Err(_) => writeln!(err, "{}", body),
    }
}
