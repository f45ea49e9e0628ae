//! # Snip Architecture
//!
//! Snipapp is a **transport-agnostic record library** for short tagged text
//! snips. It validates input, runs filtered and paginated searches, and
//! guards updates with optimistic concurrency. The `snip` binary is one client
//! of it; an HTTP server would be another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Request handler (the `snip` CLI, or any other front end)   │
//! │  - Parses requests, renders responses, picks exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes raw ids and list parameters                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, preconditions, the update flow               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - SnipStore: record operations and search planning         │
//! │  - Executor trait, SqliteExecutor (r2d2 pool)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Errors
//!
//! Everything returns [`error::Result`]. A handler maps the variants:
//!
//! | Variant | Meaning | HTTP analogue |
//! |---------|---------|---------------|
//! | `Validation` | field errors, all reported at once | 422 |
//! | `NotFound` | no such snip, or an id that can't exist | 404 |
//! | `EditConflict` | version moved on since it was read | 409 |
//! | `Store` | database failure; `is_timeout()` singles out deadlines | 500 |
//!
//! ## Testing Strategy
//!
//! 1. **Commands and store**: unit tests against a temp-dir SQLite database.
//! 2. **API**: dispatch and input normalization.
//! 3. **Scenarios** (`tests/`): end-to-end flows through the public API.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Record store, search planner, executors
//! - [`model`]: `Snip`, `SnipInput` and record validation
//! - [`filters`]: Paging, sort safelist and pagination metadata
//! - [`validator`]: Field-error accumulator
//! - [`params`]: Raw parameter readers
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod model;
pub mod params;
pub mod store;
pub mod validator;

#[cfg(test)]
pub mod test_utils;
