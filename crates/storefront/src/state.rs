//! Application state shared across the storefront.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::storage::{JsonFileRepository, Repository, StorageError};

/// Application state shared across the whole session.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the seeded catalog, and the persistence repository.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    repo: Arc<dyn Repository>,
}

impl AppState {
    /// Create application state with a file-backed repository rooted at the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorageError> {
        let repo: Arc<dyn Repository> = Arc::new(JsonFileRepository::open(config.data_dir.clone())?);
        Ok(Self::with_repository(config, repo))
    }

    /// Create application state over an existing repository. Used by tests
    /// to swap in the in-memory store.
    #[must_use]
    pub fn with_repository(config: StorefrontConfig, repo: Arc<dyn Repository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: Catalog::seeded(config.currency),
                config,
                repo,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the persistence repository.
    #[must_use]
    pub fn repository(&self) -> &dyn Repository {
        self.inner.repo.as_ref()
    }

    /// Get a cloneable handle to the persistence repository.
    #[must_use]
    pub fn repository_handle(&self) -> Arc<dyn Repository> {
        Arc::clone(&self.inner.repo)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quickbasket_core::CurrencyCode;

    use crate::storage::MemoryRepository;

    #[test]
    fn test_configured_currency_reaches_the_catalog() {
        let config = StorefrontConfig {
            currency: CurrencyCode::EUR,
            ..StorefrontConfig::default()
        };
        let state = AppState::with_repository(config, Arc::new(MemoryRepository::new()));
        assert!(
            state
                .catalog()
                .products()
                .iter()
                .all(|p| p.price.currency_code == CurrencyCode::EUR)
        );
    }

    #[test]
    fn test_state_is_cheaply_cloneable() {
        let state = AppState::with_repository(
            StorefrontConfig::default(),
            Arc::new(MemoryRepository::new()),
        );
        let clone = state.clone();
        assert_eq!(clone.catalog().products().len(), state.catalog().products().len());
    }
}
