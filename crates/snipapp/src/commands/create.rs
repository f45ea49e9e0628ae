use crate::error::Result;
use crate::model::{validate_snip, Snip, SnipInput};
use crate::store::executor::Executor;
use crate::store::SnipStore;
use crate::validator::Validator;

pub fn run<E: Executor>(store: &SnipStore<E>, input: SnipInput) -> Result<Snip> {
    let snip = input.into_snip();

    let mut v = Validator::new();
    validate_snip(&mut v, &snip);
    v.into_result()?;

    store.insert(snip)
}
