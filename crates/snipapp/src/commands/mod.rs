//! # Command Layer
//!
//! The record-handling logic of snip. Each command lives in its own submodule
//! and is a plain function over a [`SnipStore`](crate::store::SnipStore).
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate client input with a [`Validator`](crate::validator::Validator)
//!   and fail with every field error at once
//! - Enforce preconditions (expected versions) before touching the store
//! - Return domain types (`Snip`, [`list::SnipPage`]), never rendered text
//!
//! ## What Commands Do NOT Do
//!
//! - **Parse raw ids**: the API facade turns path/argument strings into ids
//! - **Any I/O**: no stdout, stderr or exit codes
//! - **Map errors to responses**: that is the caller's job
//!
//! ## Testing Strategy
//!
//! Command tests run against a throwaway SQLite database from
//! [`crate::test_utils::TestEnv`] and cover every branch and error condition.
//!
//! ## Command Modules
//!
//! - [`create`]: Validate and insert a new snip
//! - [`get`]: Fetch one snip
//! - [`list`]: Filtered, sorted, paginated search
//! - [`update`]: Partial update under optimistic concurrency
//! - [`delete`]: Remove one snip

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;
