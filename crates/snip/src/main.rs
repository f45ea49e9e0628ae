//! # Snip CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this
//! file only invokes `cli::run()` and turns its outcome into an exit status.
//!
//! ## Workspace Structure
//!
//! - `crates/snipapp/`: transport-agnostic record library
//! - `crates/snip/`: this CLI, one request handler over `snipapp::api::SnipApi`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/snip/src/cli/)                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - config, logging, store wiring and dispatch (commands.rs) │
//! │  - JSON envelopes and exit codes (render.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/snipapp/src/api.rs)                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Output Contract
//!
//! - Success: a JSON envelope on stdout, exit status 0.
//! - Failure: `{"error": ...}` on stderr. Exit status 75 when retrying may
//!   help (edit conflicts and timeouts), 1 otherwise.
//! - Logs always go to stderr.

mod cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
