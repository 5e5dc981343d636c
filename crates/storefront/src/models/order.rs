//! Placed-order snapshot type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickbasket_core::{OrderId, OrderStatus, PaymentMethod, Price};

use crate::cart::CartItem;
use crate::models::user::Address;

/// An order created at checkout completion.
///
/// Everything here is a snapshot taken at placement time: the cart lines,
/// the chosen address, and the computed total. Later catalog or address
/// edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    pub total_amount: Price,
    pub address: Address,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: String,
}
