//! Product and category reference data types.
//!
//! These are immutable catalog records: seeded once at startup and never
//! mutated at runtime. The serde representation uses camelCase field names
//! to match the persisted JSON shapes (cart snapshots embed full products).

use serde::{Deserialize, Serialize};

use quickbasket_core::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A name/value specification row shown on the product detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Promotional price; when set it wins over `price` everywhere money is
    /// computed (the "effective price").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    pub category: CategoryId,
    pub image: String,
    pub rating: f32,
    pub review_count: u32,
    pub in_stock: bool,
    pub estimated_delivery: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifications: Vec<Specification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_products: Vec<ProductId>,
}

impl Product {
    /// The price a buyer actually pays: the discount price if one is set,
    /// otherwise the regular price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quickbasket_core::CurrencyCode;

    use super::*;

    fn product(cents: i64, discount_cents: Option<i64>) -> Product {
        Product {
            id: ProductId::new("p-test"),
            name: "Test".to_owned(),
            description: String::new(),
            price: Price::from_cents(cents, CurrencyCode::USD),
            discount_price: discount_cents.map(|c| Price::from_cents(c, CurrencyCode::USD)),
            category: CategoryId::new("fruits"),
            image: String::new(),
            rating: 4.0,
            review_count: 1,
            in_stock: true,
            estimated_delivery: "Today".to_owned(),
            featured: false,
            tags: Vec::new(),
            gallery: Vec::new(),
            specifications: Vec::new(),
            related_products: Vec::new(),
        }
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        let p = product(299, Some(199));
        assert_eq!(p.effective_price(), Price::from_cents(199, CurrencyCode::USD));
    }

    #[test]
    fn test_effective_price_falls_back_to_regular() {
        let p = product(349, None);
        assert_eq!(p.effective_price(), Price::from_cents(349, CurrencyCode::USD));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let p = product(299, Some(199));
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("discountPrice").is_some());
        assert!(json.get("reviewCount").is_some());
        assert!(json.get("inStock").is_some());
    }
}
