use crate::error::Result;
use crate::filters::{validate_filters, Metadata, SortSafelist, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::model::Snip;
use crate::params::{read_csv, read_int, read_string};
use crate::store::executor::Executor;
use crate::store::SnipStore;
use crate::validator::Validator;
use serde::Serialize;

/// Raw list parameters, exactly as the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Words that must all appear in the title.
    pub title: Option<String>,
    /// Comma-separated tags that must all be present.
    pub tags: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnipPage {
    pub snips: Vec<Snip>,
    pub metadata: Metadata,
}

pub fn run<E: Executor>(
    store: &SnipStore<E>,
    params: &ListParams,
    safelist: &SortSafelist,
) -> Result<SnipPage> {
    let mut v = Validator::new();

    let title = read_string(params.title.as_deref(), "");
    let tags = read_csv(params.tags.as_deref(), &[]);
    let page = read_int(&mut v, "page", params.page.as_deref(), DEFAULT_PAGE);
    let page_size = read_int(&mut v, "page_size", params.page_size.as_deref(), DEFAULT_PAGE_SIZE);

    let filters = validate_filters(
        &mut v,
        Some(page),
        Some(page_size),
        params.sort.as_deref(),
        safelist,
    )?;

    let (snips, metadata) = store.search(&title, &tags, &filters)?;
    Ok(SnipPage { snips, metadata })
}
