use crate::error::{Result, SnipError};
use crate::model::{validate_snip, Snip, SnipInput};
use crate::store::executor::Executor;
use crate::store::SnipStore;
use crate::validator::Validator;
use tracing::debug;

/// Applies the fields present in `input` to snip `id`.
///
/// With `expected_version`, the update is refused with
/// [`SnipError::EditConflict`] unless the stored snip is still at that
/// version. Either way the write itself is conditional on the version that was
/// read, so a concurrent change between read and write also conflicts.
pub fn run<E: Executor>(
    store: &SnipStore<E>,
    id: i64,
    input: SnipInput,
    expected_version: Option<i32>,
) -> Result<Snip> {
    let mut snip = store.get(id)?;

    if let Some(expected) = expected_version {
        if expected != snip.version {
            debug!(id, expected, stored = snip.version, "client version is stale");
            return Err(SnipError::EditConflict);
        }
    }

    input.apply_to(&mut snip);

    let mut v = Validator::new();
    validate_snip(&mut v, &snip);
    v.into_result()?;

    store.update(snip)
}
