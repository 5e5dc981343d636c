//! Checkout flow state machine and order placement.
//!
//! Checkout walks Delivery -> Payment -> Review -> Confirmation. Each step
//! must be submitted in order; Payment and Review can step back. Placing
//! the order is the single side-effecting transition: it records the order
//! on the user, seeds a tracking snapshot, remembers the shipping address,
//! and clears the cart.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use quickbasket_core::{AddressId, OrderId, OrderStatus, PaymentMethod};

use crate::account::{AccountError, AccountService};
use crate::cart::CartSession;
use crate::models::{Address, Order, User};
use crate::storage::{Repository, RepositoryExt, StorageError};
use crate::tracking::TrackingSnapshot;

/// Delivery estimate shown on confirmations and seeded into tracking.
const ESTIMATED_DELIVERY: &str = "Tomorrow";

/// The four checkout steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Delivery,
    Payment,
    Review,
    Confirmation,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Delivery => "delivery",
            Self::Payment => "payment",
            Self::Review => "review",
            Self::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

/// Errors from checkout transitions and order placement.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    #[error("address not found: {0}")]
    AddressNotFound(AddressId),

    #[error("checkout is at the {actual} step, expected {expected}")]
    OutOfOrder {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// In-progress checkout state.
///
/// The flow object is plain session state; nothing is persisted until
/// [`Self::place_order`] succeeds.
#[derive(Debug)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    address: Option<Address>,
    payment_method: Option<PaymentMethod>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Delivery,
            address: None,
            payment_method: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::OutOfOrder {
                expected,
                actual: self.step,
            })
        }
    }

    /// Choose the shipping address from the user's address book and move to
    /// the payment step.
    ///
    /// # Errors
    ///
    /// Returns an error when checkout is past the delivery step or the id
    /// does not belong to the user.
    pub fn submit_delivery(&mut self, user: &User, address_id: &AddressId) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Delivery)?;
        let address = user
            .addresses
            .iter()
            .find(|a| &a.id == address_id)
            .ok_or_else(|| CheckoutError::AddressNotFound(address_id.clone()))?;
        self.address = Some(address.clone());
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Choose the payment method and move to the review step.
    ///
    /// # Errors
    ///
    /// Returns an error when checkout is not at the payment step.
    pub fn submit_payment(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment)?;
        self.payment_method = Some(method);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Step back: Payment -> Delivery, Review -> Payment. Earlier selections
    /// are kept so re-submitting is cheap.
    ///
    /// # Errors
    ///
    /// Returns an error at the delivery step (nothing to go back to) and
    /// after confirmation (the order is already placed).
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.step = match self.step {
            CheckoutStep::Payment => CheckoutStep::Delivery,
            CheckoutStep::Review => CheckoutStep::Payment,
            CheckoutStep::Delivery | CheckoutStep::Confirmation => {
                return Err(CheckoutError::OutOfOrder {
                    expected: CheckoutStep::Payment,
                    actual: self.step,
                });
            }
        };
        Ok(())
    }

    /// Place the order from the review step.
    ///
    /// On success: the order lands at the head of the user's history, a
    /// tracking snapshot is seeded, the shipping address is remembered as
    /// last used, the cart is emptied, and the flow moves to Confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error when checkout is not at the review step, the user
    /// is signed out, the cart is empty, the selected address no longer
    /// exists on the account, or persistence fails. No state changes on
    /// error.
    pub fn place_order(
        &mut self,
        cart: &mut CartSession<'_>,
        account: &mut AccountService<'_>,
        repo: &dyn Repository,
        now: DateTime<Utc>,
    ) -> Result<Order, CheckoutError> {
        self.expect_step(CheckoutStep::Review)?;
        let user = account.current_user().ok_or(CheckoutError::NotLoggedIn)?;
        if cart.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        // selections are guaranteed by the step transitions
        let (Some(address), Some(payment_method)) = (self.address.clone(), self.payment_method)
        else {
            return Err(CheckoutError::OutOfOrder {
                expected: CheckoutStep::Review,
                actual: self.step,
            });
        };
        // the address book may have changed since the delivery step
        if !user.addresses.iter().any(|a| a.id == address.id) {
            return Err(CheckoutError::AddressNotFound(address.id));
        }

        let order = Order {
            id: generate_order_id(),
            items: cart.cart().items.clone(),
            total_amount: cart.cart().total(),
            address: address.clone(),
            payment_method,
            status: OrderStatus::Processing,
            created_at: now,
            estimated_delivery: ESTIMATED_DELIVERY.to_owned(),
        };

        account.record_order(order.clone())?;
        repo.save_tracking(&TrackingSnapshot::new(
            order.id.clone(),
            address.display_line(),
            ESTIMATED_DELIVERY.to_owned(),
            now,
        ))?;
        repo.save_last_used_address(&address.id)?;
        cart.clear()?;

        self.step = CheckoutStep::Confirmation;
        info!(order_id = %order.id, total = %order.total_amount, "order placed");
        Ok(order)
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Order number in the storefront's display format: `ORD-` plus six digits.
fn generate_order_id() -> OrderId {
    OrderId::new(format!(
        "ORD-{}",
        rand::rng().random_range(100_000..1_000_000)
    ))
}
