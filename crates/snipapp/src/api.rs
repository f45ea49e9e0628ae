//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point a request handler (the `snip` CLI, or any other front end) uses.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Normalizes inputs**: raw id strings become ids, with anything that
//!   cannot name a stored snip reported as [`SnipError::NotFound`]
//! - **Dispatches** to the matching `commands::*::run`
//! - **Returns structured types**, never rendered text
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O**: no stdout, stderr or exit codes
//!
//! ## Sorting
//!
//! Lists accept the sort tokens in [`SNIP_SORT_SAFELIST`] (`id`, `title`,
//! `created_at`, each optionally prefixed with `-` for descending). The
//! default is `id`.
//!
//! ## Testing Strategy
//!
//! API tests check that raw inputs are normalized and reach the right command.
//! Command logic is tested in the command modules.

use crate::commands;
use crate::commands::list::{ListParams, SnipPage};
use crate::error::Result;
use crate::filters::SortSafelist;
use crate::model::{Snip, SnipInput};
use crate::params::read_id;
use crate::store::executor::Executor;
use crate::store::SnipStore;

pub const SNIP_SORT_SAFELIST: SortSafelist = SortSafelist::new(
    &["id", "title", "created_at", "-id", "-title", "-created_at"],
    "id",
);

/// The main API facade for snip operations.
///
/// Generic over [`Executor`] so the same facade runs on SQLite in production
/// and on scripted executors in tests.
pub struct SnipApi<E: Executor> {
    store: SnipStore<E>,
    safelist: SortSafelist,
}

impl<E: Executor> SnipApi<E> {
    pub fn new(store: SnipStore<E>) -> Self {
        Self {
            store,
            safelist: SNIP_SORT_SAFELIST,
        }
    }

    /// Replaces the sort tokens lists accept.
    pub fn with_safelist(mut self, safelist: SortSafelist) -> Self {
        self.safelist = safelist;
        self
    }

    pub fn store(&self) -> &SnipStore<E> {
        &self.store
    }

    pub fn create_snip(&self, input: SnipInput) -> Result<Snip> {
        commands::create::run(&self.store, input)
    }

    pub fn show_snip(&self, raw_id: &str) -> Result<Snip> {
        let id = read_id(raw_id)?;
        commands::get::run(&self.store, id)
    }

    pub fn list_snips(&self, params: &ListParams) -> Result<SnipPage> {
        commands::list::run(&self.store, params, &self.safelist)
    }

    pub fn update_snip(
        &self,
        raw_id: &str,
        input: SnipInput,
        expected_version: Option<i32>,
    ) -> Result<Snip> {
        let id = read_id(raw_id)?;
        commands::update::run(&self.store, id, input, expected_version)
    }

    pub fn delete_snip(&self, raw_id: &str) -> Result<()> {
        let id = read_id(raw_id)?;
        commands::delete::run(&self.store, id)
    }

    /// Succeeds when the store answers within its timeout.
    pub fn healthcheck(&self) -> Result<()> {
        self.store.ping()
    }
}
