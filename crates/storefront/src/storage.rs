//! Key-value persistence for session state.
//!
//! Session state lives under a handful of well-known string keys, in the
//! style of browser local storage. The [`Repository`] trait keeps the
//! mechanism swappable: a JSON-file store for the demo binary and an
//! in-memory store for tests.
//!
//! # Keys
//!
//! - `cart` - cart snapshot (lines plus applied promo)
//! - `user` - the logged-in user, including addresses/orders/wishlist
//! - `order_<id>` - per-order tracking snapshot
//! - `last_used_address` - id of the address used by the latest checkout
//!
//! Writes are last-write-wins with no locking; a single process is assumed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use quickbasket_core::{AddressId, OrderId};

use crate::cart::Cart;
use crate::models::User;
use crate::tracking::TrackingSnapshot;

/// Well-known storage keys.
pub mod keys {
    use quickbasket_core::OrderId;

    pub const CART: &str = "cart";
    pub const USER: &str = "user";
    pub const LAST_USED_ADDRESS: &str = "last_used_address";

    /// Key for a per-order tracking snapshot.
    #[must_use]
    pub fn order(id: &OrderId) -> String {
        format!("order_{id}")
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying store could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be (de)serialized.
    #[error("corrupt record under key '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// A string-keyed document store.
///
/// Values are opaque strings; JSON encoding is layered on top by
/// [`RepositoryExt`]. `get` of a missing key is `Ok(None)` and `delete` of a
/// missing key is a no-op, matching local-storage semantics.
pub trait Repository: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the store cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the store cannot be written.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON access over any [`Repository`].
pub trait RepositoryExt: Repository {
    /// Load and deserialize the JSON document under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if the stored document does not
    /// deserialize into `T`.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                    key: key.to_owned(),
                    message: e.to_string(),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serialize `value` to JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if serialization fails or
    /// [`StorageError::Io`] if the store cannot be written.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Corrupt {
            key: key.to_owned(),
            message: e.to_string(),
        })?;
        self.put(key, &raw)
    }

    /// Load the persisted cart snapshot.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::load_json`].
    fn load_cart(&self) -> Result<Option<Cart>, StorageError> {
        self.load_json(keys::CART)
    }

    /// Persist the cart snapshot.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::save_json`].
    fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        self.save_json(keys::CART, cart)
    }

    /// Load the persisted user, if a session exists.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::load_json`].
    fn load_user(&self) -> Result<Option<User>, StorageError> {
        self.load_json(keys::USER)
    }

    /// Persist the user snapshot.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::save_json`].
    fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.save_json(keys::USER, user)
    }

    /// Remove the persisted user (logout).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the store cannot be written.
    fn delete_user(&self) -> Result<(), StorageError> {
        self.delete(keys::USER)
    }

    /// Load the tracking snapshot for an order.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::load_json`].
    fn load_tracking(&self, order_id: &OrderId) -> Result<Option<TrackingSnapshot>, StorageError> {
        self.load_json(&keys::order(order_id))
    }

    /// Persist the tracking snapshot for an order.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::save_json`].
    fn save_tracking(&self, snapshot: &TrackingSnapshot) -> Result<(), StorageError> {
        self.save_json(&keys::order(&snapshot.order_id), snapshot)
    }

    /// Load the id of the address used by the most recent checkout.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::load_json`].
    fn load_last_used_address(&self) -> Result<Option<AddressId>, StorageError> {
        self.load_json(keys::LAST_USED_ADDRESS)
    }

    /// Remember the address used at checkout for pre-selection next time.
    ///
    /// # Errors
    ///
    /// See [`RepositoryExt::save_json`].
    fn save_last_used_address(&self, id: &AddressId) -> Result<(), StorageError> {
        self.save_json(keys::LAST_USED_ADDRESS, id)
    }
}

impl<R: Repository + ?Sized> RepositoryExt for R {}

/// File-backed repository: one JSON file per key under a data directory.
///
/// This is the demo binary's stand-in for browser local storage.
#[derive(Debug)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Open (creating if necessary) a repository rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Repository for JsonFileRepository {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// In-memory repository for tests.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryRepository {
    /// Create an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Io(std::io::Error::other("repository mutex poisoned"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_repository_roundtrip() {
        let repo = MemoryRepository::new();
        assert!(repo.get("cart").unwrap().is_none());

        repo.put("cart", "[]").unwrap();
        assert_eq!(repo.get("cart").unwrap().as_deref(), Some("[]"));

        repo.delete("cart").unwrap();
        assert!(repo.get("cart").unwrap().is_none());
        // Deleting a missing key is a no-op
        repo.delete("cart").unwrap();
    }

    #[test]
    fn test_file_repository_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).unwrap();

        assert!(repo.get("user").unwrap().is_none());
        repo.put("user", "{\"id\":\"user1\"}").unwrap();
        assert_eq!(repo.get("user").unwrap().as_deref(), Some("{\"id\":\"user1\"}"));

        repo.delete("user").unwrap();
        assert!(repo.get("user").unwrap().is_none());
    }

    #[test]
    fn test_load_json_rejects_corrupt_document() {
        let repo = MemoryRepository::new();
        repo.put("cart", "definitely not json").unwrap();

        let result = repo.load_json::<serde_json::Value>("cart");
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_order_key_format() {
        let id = OrderId::new("ORD-123456");
        assert_eq!(keys::order(&id), "order_ORD-123456");
    }
}
