//! Unified error handling.
//!
//! Provides a unified `AppError` that every storefront concern converts
//! into, so the binary and the integration suite can work with a single
//! `Result<T>` alias.

use thiserror::Error;

use crate::account::AccountError;
use crate::cart::{CartSessionError, PromoError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Account or session operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Promo code redemption failed.
    #[error("Promo error: {0}")]
    Promo(#[from] PromoError),

    /// Checkout transition or order placement failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<CartSessionError> for AppError {
    fn from(err: CartSessionError) -> Self {
        match err {
            CartSessionError::Promo(e) => Self::Promo(e),
            CartSessionError::Storage(e) => Self::Storage(e),
        }
    }
}

/// Convenience alias used throughout the storefront.
pub type Result<T> = std::result::Result<T, AppError>;
