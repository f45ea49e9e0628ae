//! # Rendering Module
//!
//! Builds the JSON envelopes the CLI prints and picks exit codes.
//!
//! ## Error Envelopes
//!
//! | Error | Body | Exit |
//! |-------|------|------|
//! | `Validation` | `{"error": {"field": "message", ...}}` | 1 |
//! | `NotFound` | `{"error": "the requested resource could not be found"}` | 1 |
//! | `EditConflict` | `{"error": "unable to update the record due to an edit conflict, please try again"}` | 75 |
//! | store timeout | `{"error": SERVER_ERROR}` | 75 |
//! | other store / config | `{"error": SERVER_ERROR}` | 1 |
//!
//! Store failure details never reach the envelope; the library has already
//! logged them.

use serde_json::{json, Value};
use snipapp::commands::list::SnipPage;
use snipapp::error::SnipError;
use snipapp::model::Snip;
use std::io::{self, Write};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// `EX_TEMPFAIL` from sysexits.h: the same request may succeed later.
pub const EXIT_TEMPFAIL: i32 = 75;

pub const SERVER_ERROR: &str = "the server encountered a problem and could not process your request";
pub const DELETED_MESSAGE: &str = "snip successfully deleted";

pub fn snip_value(snip: &Snip) -> Value {
    json!({ "snip": snip })
}

pub fn page_value(page: &SnipPage) -> Value {
    json!({ "snips": page.snips, "metadata": page.metadata })
}

pub fn deleted_value() -> Value {
    json!({ "message": DELETED_MESSAGE })
}

pub fn health_value(environment: &str, version: &str) -> Value {
    json!({
        "status": "available",
        "system_info": {
            "environment": environment,
            "version": version,
        }
    })
}

pub fn error_value(err: &SnipError) -> Value {
    match err {
        SnipError::Validation(errors) => json!({ "error": errors }),
        SnipError::NotFound | SnipError::EditConflict => json!({ "error": err.to_string() }),
        SnipError::Store(_) | SnipError::Config(_) => json!({ "error": SERVER_ERROR }),
    }
}

pub fn exit_code(err: &SnipError) -> i32 {
    if matches!(err, SnipError::EditConflict) || err.is_timeout() {
        EXIT_TEMPFAIL
    } else {
        EXIT_FAILURE
    }
}

fn write_json(out: &mut impl Write, body: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, body)?;
    writeln!(out)
}

/// Prints the outcome and returns the process exit code.
pub fn emit(outcome: Result<Value, SnipError>) -> io::Result<i32> {
    match outcome {
        Ok(body) => {
            write_json(&mut io::stdout().lock(), &body)?;
            Ok(EXIT_OK)
        }
        Err(err) => {
            write_json(&mut io::stderr().lock(), &error_value(&err))?;
            Ok(exit_code(&err))
        }
    }
}
