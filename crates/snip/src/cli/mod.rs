//! # CLI Behavior
//!
//! This is **one possible request handler** for snipapp, not the application
//! itself. It is the only place that knows about stdout, stderr and exit codes.
//!
//! ## Commands
//!
//! | Command | Envelope on success |
//! |---------|---------------------|
//! | `snip create --title T [--content C] [--tag X]...` | `{"snip": {...}}` |
//! | `snip show <id>` | `{"snip": {...}}` |
//! | `snip list [--title] [--tags a,b] [--page] [--page-size] [--sort]` | `{"snips": [...], "metadata": {...}}` |
//! | `snip update <id> [--title] [--content] [--tag X... \| --clear-tags] [--if-version N]` | `{"snip": {...}}` |
//! | `snip delete <id>` | `{"message": "snip successfully deleted"}` |
//! | `snip healthcheck` | `{"status": "available", "system_info": {...}}` |
//!
//! List parameters are passed through as raw strings so the library reports
//! bad values (`--page one`) as field errors, the same way it would for a
//! query string.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and dispatch to the API
//! - `logging`: `tracing` subscriber setup
//! - `render`: Success and error envelopes, exit codes
//! - `setup`: Argument parsing via clap

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
