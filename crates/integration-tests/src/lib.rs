//! Integration tests for QuickBasket.
//!
//! The suites under `tests/` exercise the storefront library end to end:
//! session restore, cart pricing, checkout, and the tracking simulator.
//! No network or database is involved; persistence runs against either the
//! in-memory repository or a JSON-file repository in a temp directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickbasket-integration-tests
//! ```

use std::sync::Arc;

use tempfile::TempDir;

use quickbasket_storefront::config::StorefrontConfig;
use quickbasket_storefront::state::AppState;
use quickbasket_storefront::storage::{JsonFileRepository, MemoryRepository, Repository};

/// Shared fixture: application state plus whatever keeps its storage alive.
pub struct TestContext {
    pub state: AppState,
    // Held so a file-backed store is not deleted mid-test
    _data_dir: Option<TempDir>,
}

impl TestContext {
    /// State over the in-memory repository.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::in_memory_with_config(StorefrontConfig::default())
    }

    /// State over the in-memory repository with a custom configuration, for
    /// tests that assert config-driven behavior.
    #[must_use]
    pub fn in_memory_with_config(config: StorefrontConfig) -> Self {
        Self {
            state: AppState::with_repository(config, Arc::new(MemoryRepository::new())),
            _data_dir: None,
        }
    }

    /// State over a JSON-file repository in a temp directory, for tests
    /// that assert persistence across "restarts".
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or repository cannot be created.
    #[must_use]
    pub fn file_backed() -> Self {
        #[allow(clippy::unwrap_used)]
        let dir = TempDir::new().unwrap();
        #[allow(clippy::unwrap_used)]
        let repo: Arc<dyn Repository> =
            Arc::new(JsonFileRepository::open(dir.path().to_path_buf()).unwrap());
        Self {
            state: AppState::with_repository(StorefrontConfig::default(), repo),
            _data_dir: Some(dir),
        }
    }

    /// A second state over the same file-backed data directory, simulating
    /// a process restart.
    ///
    /// # Panics
    ///
    /// Panics when called on an in-memory context or if the repository
    /// cannot be reopened.
    #[must_use]
    pub fn reopen(&self) -> AppState {
        let dir = self
            ._data_dir
            .as_ref()
            .expect("reopen needs a file-backed context");
        #[allow(clippy::unwrap_used)]
        let repo: Arc<dyn Repository> =
            Arc::new(JsonFileRepository::open(dir.path().to_path_buf()).unwrap());
        AppState::with_repository(StorefrontConfig::default(), repo)
    }
}
