//! Status enums for orders, tracking milestones, and payment.
//!
//! The serde representations match the JSON shapes persisted by the
//! storefront (`"pending"`, `"in-progress"`, `"Cash on Delivery"`, ...),
//! so snapshots written by one session load cleanly in the next.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

/// Status of a single tracking milestone.
///
/// Exactly one milestone is `InProgress` at a time until the final
/// milestone completes; the tracking state machine in the storefront crate
/// maintains that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Completed,
    InProgress,
    #[default]
    Pending,
}

impl StepStatus {
    /// Whether this step has finished.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Payment method selected at checkout.
///
/// Serialized with the human-readable labels shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Wallet")]
    Wallet,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Upi => write!(f, "UPI"),
            Self::CashOnDelivery => write!(f, "Cash on Delivery"),
            Self::Wallet => write!(f, "Wallet"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Credit Card" => Ok(Self::CreditCard),
            "UPI" => Ok(Self::Upi),
            "Cash on Delivery" => Ok(Self::CashOnDelivery),
            "Wallet" => Ok(Self::Wallet),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        let status: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn test_step_status_kebab_case() {
        assert_eq!(
            serde_json::to_string(&StepStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: StepStatus = serde_json::from_str("\"completed\"").unwrap();
        assert!(status.is_completed());
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"Cash on Delivery\""
        );
        assert_eq!(PaymentMethod::Upi.to_string(), "UPI");

        let method: PaymentMethod = "Credit Card".parse().unwrap();
        assert_eq!(method, PaymentMethod::CreditCard);
        assert!("Barter".parse::<PaymentMethod>().is_err());
    }
}
