use crate::api::SnipApi;
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::store::executor::{Executor, Row, Statement};
use crate::store::sqlite::SqliteExecutor;
use crate::store::SnipStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub config: DatabaseConfig,
    pub executor: SqliteExecutor,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_pool_size(4)
    }

    pub fn with_pool_size(max_open_conns: u32) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = DatabaseConfig {
            path: temp_dir.path().join("snips.db"),
            max_open_conns,
            max_idle_conns: 1,
            connect_timeout_ms: 2000,
            query_timeout_ms: 2000,
            ..Default::default()
        };
        let executor = SqliteExecutor::open(&config).expect("failed to open test database");
        Self {
            _temp_dir: temp_dir,
            config,
            executor,
        }
    }

    pub fn store(&self) -> SnipStore<SqliteExecutor> {
        SnipStore::new(self.executor.clone(), self.config.query_timeout())
    }

    pub fn api(&self) -> SnipApi<SqliteExecutor> {
        SnipApi::new(self.store())
    }
}

/// Executor whose every call fails. Counts the calls it receives.
pub struct FailingExecutor {
    make_error: fn() -> StoreError,
    calls: AtomicUsize,
}

impl FailingExecutor {
    pub fn new(make_error: fn() -> StoreError) -> Self {
        Self {
            make_error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn timing_out() -> Self {
        Self::new(|| StoreError::Timeout(Duration::from_millis(10)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Executor for FailingExecutor {
    fn query(&self, _stmt: &Statement, _timeout: Duration) -> Result<Vec<Row>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }

    fn execute(&self, _stmt: &Statement, _timeout: Duration) -> Result<usize, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }
}
