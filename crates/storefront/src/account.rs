//! User session, wishlist, and address book management.
//!
//! Authentication is intentionally mock-grade: the only accepted login is
//! the canned demo account, and registration materializes a fresh user on
//! the spot. Every successful mutation writes the user document back to the
//! repository so a restart restores the session.

use quickbasket_core::{AddressId, Email, EmailError, ProductId, UserId};
use uuid::Uuid;

use crate::models::{Address, NewAddress, Order, Product, User};
use crate::storage::{Repository, RepositoryExt, StorageError};

/// Credentials accepted by the demo login.
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password";

/// Errors from account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("product {0} is already in the wishlist")]
    AlreadyInWishlist(ProductId),

    #[error("address not found: {0}")]
    AddressNotFound(AddressId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The default "Home" address every mock profile starts with.
fn home_address() -> Address {
    Address {
        id: AddressId::new("addr1"),
        name: "Home".to_owned(),
        line1: "123 Main St".to_owned(),
        line2: None,
        city: "Anytown".to_owned(),
        state: "State".to_owned(),
        postal_code: "12345".to_owned(),
        country: "Country".to_owned(),
        is_default: true,
    }
}

/// The canned account returned by a successful demo login: one default
/// "Home" address, no history.
fn demo_user(email: Email) -> User {
    User {
        id: UserId::new("user1"),
        name: "Demo User".to_owned(),
        email,
        addresses: vec![home_address()],
        orders: Vec::new(),
        wishlist: Vec::new(),
    }
}

/// Stateful account service bound to a repository.
///
/// Holds the current session (if any) in memory and persists the user
/// document after every mutation.
pub struct AccountService<'a> {
    repo: &'a dyn Repository,
    user: Option<User>,
}

impl<'a> AccountService<'a> {
    /// Restore any persisted session from the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    pub fn restore(repo: &'a dyn Repository) -> Result<Self, StorageError> {
        let user = repo.load_user()?;
        Ok(Self { repo, user })
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Sign in with the demo credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidEmail`] for a malformed email and
    /// [`AccountError::InvalidCredentials`] for anything but the demo pair.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AccountError> {
        let email = Email::parse(email)?;
        if email.as_str() != DEMO_EMAIL || password != DEMO_PASSWORD {
            return Err(AccountError::InvalidCredentials);
        }
        let user = demo_user(email);
        self.repo.save_user(&user)?;
        Ok(self.user.insert(user))
    }

    /// Create a new account and sign it in. No credential store backs this;
    /// the password is validated for presence only. The profile is cut from
    /// the same mock template as the demo login, so it starts with the
    /// default "Home" address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidEmail`] for a malformed email and
    /// [`AccountError::InvalidCredentials`] for an empty password.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<&User, AccountError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AccountError::InvalidCredentials);
        }
        let user = User {
            id: UserId::new(format!("user-{}", Uuid::new_v4())),
            name: name.to_owned(),
            email,
            addresses: vec![home_address()],
            orders: Vec::new(),
            wishlist: Vec::new(),
        };
        self.repo.save_user(&user)?;
        Ok(self.user.insert(user))
    }

    /// End the session and delete the persisted user document. Signing out
    /// while signed out is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted document cannot be removed.
    pub fn logout(&mut self) -> Result<(), AccountError> {
        if self.user.take().is_some() {
            self.repo.delete_user()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Wishlist
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns an error when signed out, when the product is already listed,
    /// or when the user document cannot be persisted.
    pub fn add_to_wishlist(&mut self, product: Product) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        if user.wishlist.iter().any(|p| p.id == product.id) {
            return Err(AccountError::AlreadyInWishlist(product.id));
        }
        user.wishlist.push(product);
        self.repo.save_user(user)?;
        Ok(())
    }

    /// Removing a product that is not listed is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the user document cannot be
    /// persisted.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        user.wishlist.retain(|p| &p.id != product_id);
        self.repo.save_user(user)?;
        Ok(())
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.wishlist.iter().any(|p| &p.id == product_id))
    }

    // ------------------------------------------------------------------------
    // Address book
    // ------------------------------------------------------------------------

    /// Add an address and return its generated id.
    ///
    /// The first address on an account is always made the default. If the
    /// new address asks to be the default, the flag is cleared from every
    /// other address first.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the user document cannot be
    /// persisted.
    pub fn add_address(&mut self, new: NewAddress) -> Result<AddressId, AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        let is_default = new.is_default || user.addresses.is_empty();
        if is_default {
            for address in &mut user.addresses {
                address.is_default = false;
            }
        }
        let id = AddressId::new(format!("addr-{}", Uuid::new_v4()));
        user.addresses.push(Address {
            id: id.clone(),
            name: new.name,
            line1: new.line1,
            line2: new.line2,
            city: new.city,
            state: new.state,
            postal_code: new.postal_code,
            country: new.country,
            is_default,
        });
        self.repo.save_user(user)?;
        Ok(id)
    }

    /// Replace an address wholesale, matched by id.
    ///
    /// This is a raw field update: it does not rebalance the default flag,
    /// so a caller that flips `is_default` here should go through
    /// [`Self::set_default_address`] instead.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out, when no address has the given id,
    /// or when the user document cannot be persisted.
    pub fn update_address(&mut self, updated: Address) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        let slot = user
            .addresses
            .iter_mut()
            .find(|a| a.id == updated.id)
            .ok_or_else(|| AccountError::AddressNotFound(updated.id.clone()))?;
        *slot = updated;
        self.repo.save_user(user)?;
        Ok(())
    }

    /// Remove an address. Unknown ids are a no-op. If the removed address
    /// was the default, the first remaining address (if any) is promoted.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the user document cannot be
    /// persisted.
    pub fn remove_address(&mut self, id: &AddressId) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        let removed_default = user
            .addresses
            .iter()
            .any(|a| &a.id == id && a.is_default);
        user.addresses.retain(|a| &a.id != id);
        if removed_default && let Some(first) = user.addresses.first_mut() {
            first.is_default = true;
        }
        self.repo.save_user(user)?;
        Ok(())
    }

    /// Mark one address as the default, clearing the flag everywhere else.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out, when no address has the given id,
    /// or when the user document cannot be persisted.
    pub fn set_default_address(&mut self, id: &AddressId) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        if !user.addresses.iter().any(|a| &a.id == id) {
            return Err(AccountError::AddressNotFound(id.clone()));
        }
        for address in &mut user.addresses {
            address.is_default = &address.id == id;
        }
        self.repo.save_user(user)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Order history
    // ------------------------------------------------------------------------

    /// Prepend a placed order to the user's history (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the user document cannot be
    /// persisted.
    pub fn record_order(&mut self, order: Order) -> Result<(), AccountError> {
        let user = self.user.as_mut().ok_or(AccountError::NotLoggedIn)?;
        user.orders.insert(0, order);
        self.repo.save_user(user)?;
        Ok(())
    }
}
