//! Shopping cart and pricing engine.
//!
//! The cart holds full product snapshots (not just ids) so a line renders
//! even if the catalog entry changes later. All money math runs on
//! [`rust_decimal::Decimal`] via [`Price`].
//!
//! Pricing rules:
//! - a line is priced at the product's discount price when one is set;
//! - shipping is free for an empty cart or a subtotal over $50, else $4.99;
//! - an applied promo code takes a flat percentage off the subtotal;
//! - `total = subtotal + shipping - discount`.

use quickbasket_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::storage::{Repository, RepositoryExt, StorageError};

/// Subtotal above which shipping is free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold, in cents.
const SHIPPING_FEE_CENTS: i64 = 499;

// ============================================================================
// Promo codes
// ============================================================================

/// A redeemable promo code definition.
///
/// Only `code` and `discount_percentage` participate in pricing today;
/// `expiry_date`, `min_purchase`, and `max_discount` are carried on the
/// record but not yet enforced at redemption time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub code: String,
    pub discount_percentage: u32,
    pub expiry_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Decimal>,
}

/// The built-in promo table. Codes are matched case-sensitively.
#[must_use]
pub fn find_promo(code: &str) -> Option<PromoCode> {
    let (discount_percentage, expiry_date, min_purchase, max_discount) = match code {
        "WELCOME10" => (10, "2026-12-31", None, None),
        "SUMMER20" => (20, "2026-09-30", Some(Decimal::from(30)), None),
        "FLASH50" => (50, "2026-09-07", Some(Decimal::from(100)), Some(Decimal::from(75))),
        _ => return None,
    };
    Some(PromoCode {
        code: code.to_owned(),
        discount_percentage,
        expiry_date: expiry_date.to_owned(),
        min_purchase,
        max_discount,
    })
}

/// Errors from promo code redemption.
#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    #[error("invalid promo code: {0}")]
    InvalidCode(String),
}

// ============================================================================
// Cart
// ============================================================================

/// A single cart line: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        let unit = self.product.effective_price();
        Price::new(
            unit.amount * Decimal::from(self.quantity),
            unit.currency_code,
        )
    }
}

/// A promo code applied to the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromo {
    pub code: String,
    pub discount_percentage: u32,
}

/// The shopping cart: line items plus an optional applied promo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo: Option<AppliedPromo>,
}

impl Cart {
    /// An empty cart with no promo applied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Add `quantity` units of a product. If the product is already in the
    /// cart the quantities merge onto the existing line.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            item.quantity += quantity;
        } else {
            self.items.push(CartItem { product, quantity });
        }
    }

    /// Set the quantity of an existing line. A quantity of zero removes the
    /// line; an unknown product id is a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
        {
            item.quantity = quantity;
        }
    }

    /// Remove a line entirely. Unknown ids are a no-op.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|item| &item.product.id != product_id);
    }

    /// Empty the cart. Any applied promo is dropped with the items.
    pub fn clear(&mut self) {
        self.items.clear();
        self.promo = None;
    }

    fn currency(&self) -> CurrencyCode {
        self.items
            .first()
            .map_or_else(CurrencyCode::default, |item| {
                item.product.effective_price().currency_code
            })
    }

    /// Sum of line totals at effective prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let amount = self
            .items
            .iter()
            .map(|item| item.line_total().amount)
            .sum::<Decimal>();
        Price::new(amount, self.currency())
    }

    /// Flat-rate shipping: free for an empty cart or a subtotal over the
    /// free-shipping threshold, otherwise $4.99.
    #[must_use]
    pub fn shipping_fee(&self) -> Price {
        let subtotal = self.subtotal();
        if subtotal.is_zero() || subtotal.amount > FREE_SHIPPING_THRESHOLD {
            Price::zero(self.currency())
        } else {
            Price::from_cents(SHIPPING_FEE_CENTS, self.currency())
        }
    }

    /// Discount from the applied promo: a flat percentage of the subtotal.
    #[must_use]
    pub fn discount_amount(&self) -> Price {
        let Some(promo) = &self.promo else {
            return Price::zero(self.currency());
        };
        let subtotal = self.subtotal();
        Price::new(
            subtotal.amount * Decimal::from(promo.discount_percentage) / Decimal::from(100u32),
            subtotal.currency_code,
        )
    }

    /// `subtotal + shipping - discount`.
    #[must_use]
    pub fn total(&self) -> Price {
        let subtotal = self.subtotal();
        Price::new(
            subtotal.amount + self.shipping_fee().amount - self.discount_amount().amount,
            subtotal.currency_code,
        )
    }

    /// Apply a promo code, replacing any previously applied one. Codes are
    /// matched case-sensitively against the built-in table.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::InvalidCode`] when the code is unknown.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<&AppliedPromo, PromoError> {
        let promo = find_promo(code).ok_or_else(|| PromoError::InvalidCode(code.to_owned()))?;
        Ok(self.promo.insert(AppliedPromo {
            code: promo.code,
            discount_percentage: promo.discount_percentage,
        }))
    }

    /// Drop the applied promo, if any.
    pub fn remove_promo_code(&mut self) {
        self.promo = None;
    }
}

// ============================================================================
// Persistent session
// ============================================================================

/// A cart bound to a repository. Every mutation is written back
/// immediately, so the latest cart is always on disk.
pub struct CartSession<'a> {
    repo: &'a dyn Repository,
    cart: Cart,
}

impl<'a> CartSession<'a> {
    /// Restore the persisted cart, or start empty if none was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    pub fn restore(repo: &'a dyn Repository) -> Result<Self, StorageError> {
        let cart = repo.load_cart()?.unwrap_or_default();
        Ok(Self { repo, cart })
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), StorageError> {
        self.cart.add(product, quantity);
        self.persist()
    }

    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StorageError> {
        self.cart.update_quantity(product_id, quantity);
        self.persist()
    }

    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<(), StorageError> {
        self.cart.remove(product_id);
        self.persist()
    }

    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.persist()
    }

    /// # Errors
    ///
    /// Returns an error for an unknown code (nothing is written in that
    /// case) or if the cart cannot be persisted.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<(), CartSessionError> {
        self.cart.apply_promo_code(code)?;
        self.persist()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_promo_code(&mut self) -> Result<(), StorageError> {
        self.cart.remove_promo_code();
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.repo.save_cart(&self.cart)
    }
}

/// Errors from persistent cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartSessionError {
    #[error(transparent)]
    Promo(#[from] PromoError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
