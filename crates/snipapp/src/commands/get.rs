use crate::error::Result;
use crate::model::Snip;
use crate::store::executor::Executor;
use crate::store::SnipStore;

pub fn run<E: Executor>(store: &SnipStore<E>, id: i64) -> Result<Snip> {
    store.get(id)
}
