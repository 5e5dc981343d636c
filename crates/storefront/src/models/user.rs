//! User and address domain types.

use serde::{Deserialize, Serialize};

use quickbasket_core::{AddressId, Email, UserId};

use crate::models::order::Order;
use crate::models::product::Product;

/// A shipping address on a user's account.
///
/// At most one address per user carries `is_default = true`; the account
/// service maintains that invariant on add/remove/set-default (but not on
/// raw update, see [`crate::account::AccountService::update_address`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// Label such as "Home" or "Office".
    pub name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line display form used on tracking views,
    /// e.g. "123 Main St, Anytown, State 12345".
    #[must_use]
    pub fn display_line(&self) -> String {
        match &self.line2 {
            Some(line2) => format!(
                "{}, {}, {}, {} {}",
                self.line1, line2, self.city, self.state, self.postal_code
            ),
            None => format!(
                "{}, {}, {} {}",
                self.line1, self.city, self.state, self.postal_code
            ),
        }
    }
}

/// Input for creating an address; the account service assigns the id.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// An authenticated storefront user with their accumulated session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
    pub wishlist: Vec<Product>,
}

impl User {
    /// The address flagged for pre-selection at checkout, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address(line2: Option<&str>) -> Address {
        Address {
            id: AddressId::new("addr-1"),
            name: "Home".to_owned(),
            line1: "123 Main St".to_owned(),
            line2: line2.map(str::to_owned),
            city: "Anytown".to_owned(),
            state: "State".to_owned(),
            postal_code: "12345".to_owned(),
            country: "Country".to_owned(),
            is_default: true,
        }
    }

    #[test]
    fn test_display_line_without_line2() {
        assert_eq!(address(None).display_line(), "123 Main St, Anytown, State 12345");
    }

    #[test]
    fn test_display_line_with_line2() {
        assert_eq!(
            address(Some("Apt 4B")).display_line(),
            "123 Main St, Apt 4B, Anytown, State 12345"
        );
    }
}
