//! Static product catalog.
//!
//! The catalog is seeded once at startup and read-only thereafter; nothing
//! in the storefront mutates a product record. Lookups mirror the helper
//! surface the UI consumes: by category, featured, by id, related, and a
//! substring search over name/description/tags.

use std::sync::Arc;

use quickbasket_core::{CategoryId, CurrencyCode, Price, ProductId};

use crate::models::{Category, Product, Specification};

/// Immutable catalog of categories and products.
///
/// Cheap to clone; the seeded data is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Arc<Vec<Category>>,
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Build the catalog from the built-in seed data, pricing every product
    /// in the given display currency.
    #[must_use]
    pub fn seeded(currency: CurrencyCode) -> Self {
        Self {
            categories: Arc::new(seed_categories()),
            products: Arc::new(seed_products(currency)),
        }
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category_by_id(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// All products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id. `None` maps to the not-found page upstream.
    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products belonging to the given category.
    #[must_use]
    pub fn products_by_category(&self, category: &CategoryId) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| &p.category == category)
            .collect()
    }

    /// Products flagged for the home-page feature rail.
    #[must_use]
    pub fn featured_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }

    /// Resolve a product's related-product references, skipping any id that
    /// no longer exists in the catalog.
    #[must_use]
    pub fn related_products(&self, id: &ProductId) -> Vec<&Product> {
        let Some(product) = self.product_by_id(id) else {
            return Vec::new();
        };
        product
            .related_products
            .iter()
            .filter_map(|related| self.product_by_id(related))
            .collect()
    }

    /// Case-insensitive substring search over name, description, and tags.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded(CurrencyCode::default())
    }
}

fn seed_categories() -> Vec<Category> {
    let category = |id: &str, name: &str, description: &str| Category {
        id: CategoryId::new(id),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        image: None,
    };

    vec![
        category(
            "fruits",
            "Fruits & Vegetables",
            "Fresh fruits and vegetables delivered to your doorstep",
        ),
        category(
            "dairy",
            "Dairy & Breakfast",
            "Milk, cheese, butter, and breakfast essentials",
        ),
        category(
            "bakery",
            "Bakery & Snacks",
            "Freshly baked goods and delicious snacks",
        ),
        category("beverages", "Beverages", "Refreshing drinks and beverages"),
        category("meats", "Meat & Seafood", "Fresh meat and seafood"),
        category("household", "Household", "Everyday household essentials"),
    ]
}

/// Shorthand constructor for seed entries; gallery and specifications stay
/// empty unless a product sets them explicitly below.
#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    cents: i64,
    discount_cents: Option<i64>,
    category: &str,
    rating: f32,
    review_count: u32,
    featured: bool,
    tags: &[&str],
    related: &[&str],
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Price::from_cents(cents, CurrencyCode::USD),
        discount_price: discount_cents.map(|c| Price::from_cents(c, CurrencyCode::USD)),
        category: CategoryId::new(category),
        image: format!("/images/products/{id}.jpg"),
        rating,
        review_count,
        in_stock: true,
        estimated_delivery: "Today".to_owned(),
        featured,
        tags: tags.iter().map(|&t| t.to_owned()).collect(),
        gallery: Vec::new(),
        specifications: Vec::new(),
        related_products: related.iter().map(|&r| ProductId::new(r)).collect(),
    }
}

fn spec(name: &str, value: &str) -> Specification {
    Specification {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}

/// Seed amounts are authored in cents; the configured display currency is
/// stamped onto every price before the catalog is published.
fn seed_products(currency: CurrencyCode) -> Vec<Product> {
    let mut bananas = product(
        "p1",
        "Organic Bananas",
        "Sweet and nutritious organic bananas. Perfect for smoothies or a quick healthy snack. \
         Sourced from eco-friendly farms.",
        299,
        Some(199),
        "fruits",
        4.5,
        128,
        true,
        &["organic", "fruit", "fresh"],
        &["p2", "p3", "p4"],
    );
    bananas.gallery = vec![
        "/images/products/p1.jpg".to_owned(),
        "/images/products/p1-2.jpg".to_owned(),
        "/images/products/p1-3.jpg".to_owned(),
    ];
    bananas.specifications = vec![
        spec("Origin", "Ecuador"),
        spec("Type", "Cavendish"),
        spec("Packaging", "Bunch of 5-7"),
        spec("Weight", "~1kg"),
        spec("Certification", "Organic"),
    ];

    let mut milk = product(
        "p6",
        "Whole Milk",
        "Fresh whole milk from grass-fed cows. Rich and creamy with essential nutrients. \
         Perfect for drinking, cooking, or adding to coffee.",
        329,
        None,
        "dairy",
        4.4,
        143,
        true,
        &["dairy", "breakfast"],
        &["p7", "p8", "p9"],
    );
    milk.specifications = vec![
        spec("Volume", "1 gallon"),
        spec("Fat Content", "3.25%"),
        spec("Source", "Grass-fed cows"),
        spec("Shelf Life", "7-10 days"),
    ];

    let mut bread = product(
        "p11",
        "Freshly Baked Bread",
        "Artisanal freshly baked bread with a crispy crust and soft interior. \
         Made daily with premium ingredients.",
        499,
        None,
        "bakery",
        4.9,
        214,
        true,
        &["bakery", "bread", "fresh"],
        &["p12", "p1", "p6"],
    );
    bread.specifications = vec![
        spec("Type", "Sourdough"),
        spec("Weight", "500g"),
        spec("Baked", "Daily"),
    ];

    let mut products = vec![
        bananas,
        product(
            "p2",
            "Red Apples",
            "Crisp and juicy red apples. High in fiber and vitamin C. Perfect for snacking, \
             baking, or adding to salads.",
            349,
            None,
            "fruits",
            4.3,
            92,
            false,
            &["fruit", "fresh"],
            &["p1", "p3", "p5"],
        ),
        product(
            "p3",
            "Avocado",
            "Creamy and nutritious avocados. Rich in healthy fats and perfect for guacamole, \
             toast, or salads.",
            299,
            Some(199),
            "fruits",
            4.7,
            156,
            false,
            &["fruit", "fresh"],
            &["p1", "p2", "p4"],
        ),
        product(
            "p4",
            "Fresh Spinach",
            "Nutrient-packed fresh spinach. Great for salads, smoothies, and cooking. \
             High in iron and vitamins.",
            199,
            None,
            "fruits",
            4.2,
            78,
            false,
            &["vegetable", "fresh", "leafy greens"],
            &["p5", "p6", "p1"],
        ),
        product(
            "p5",
            "Cherry Tomatoes",
            "Sweet and tangy cherry tomatoes. Perfect for salads, cooking, or snacking. \
             Bursting with flavor.",
            399,
            None,
            "fruits",
            4.6,
            112,
            false,
            &["vegetable", "fresh"],
            &["p4", "p6", "p2"],
        ),
        milk,
        product(
            "p7",
            "Greek Yogurt",
            "Creamy and protein-rich Greek yogurt. A versatile dairy product perfect for \
             breakfast, snacks, or cooking.",
            499,
            Some(399),
            "dairy",
            4.8,
            187,
            false,
            &["dairy", "breakfast", "protein"],
            &["p6", "p8", "p10"],
        ),
        product(
            "p8",
            "Artisan Cheddar Cheese",
            "Aged artisan cheddar cheese with a rich, sharp flavor. Perfect for sandwiches, \
             cheese boards, or cooking.",
            699,
            None,
            "dairy",
            4.7,
            136,
            false,
            &["dairy", "cheese"],
            &["p6", "p7", "p9"],
        ),
        product(
            "p9",
            "Free-Range Eggs",
            "Farm-fresh free-range eggs from humanely raised chickens. Rich in protein and \
             essential nutrients.",
            449,
            None,
            "dairy",
            4.5,
            124,
            false,
            &["breakfast", "protein"],
            &["p6", "p7", "p10"],
        ),
        product(
            "p10",
            "Granola Cereal",
            "Crunchy granola cereal with nuts, seeds, and dried fruits. A nutritious and \
             delicious breakfast option.",
            549,
            None,
            "dairy",
            4.3,
            108,
            false,
            &["breakfast", "cereal"],
            &["p7", "p9", "p11"],
        ),
        bread,
        product(
            "p12",
            "Chocolate Chip Cookies",
            "Soft and chewy chocolate chip cookies. Made with real butter and premium \
             chocolate chips.",
            599,
            None,
            "bakery",
            4.6,
            167,
            false,
            &["bakery", "cookies", "dessert"],
            &["p11", "p1", "p10"],
        ),
        product(
            "p16",
            "Sparkling Water",
            "Refreshing sparkling water with a hint of lime. Zero calories and no artificial \
             sweeteners.",
            199,
            Some(149),
            "beverages",
            4.2,
            95,
            true,
            &["beverage", "water", "refreshing"],
            &["p17", "p6", "p10"],
        ),
        product(
            "p17",
            "Green Tea",
            "Premium organic green tea leaves. Rich in antioxidants and known for its health \
             benefits.",
            649,
            None,
            "beverages",
            4.7,
            152,
            false,
            &["beverage", "tea", "organic"],
            &["p16", "p6", "p7"],
        ),
        product(
            "p19",
            "Chicken Breast",
            "Boneless, skinless chicken breast from free-range chickens. Versatile, lean \
             protein for countless recipes.",
            799,
            Some(699),
            "meats",
            4.5,
            128,
            false,
            &["meat", "chicken", "protein"],
            &["p20", "p9", "p8"],
        ),
        product(
            "p20",
            "Salmon Fillet",
            "Fresh Atlantic salmon fillet. Rich in omega-3 fatty acids and protein. Perfect \
             for grilling, baking, or pan-searing.",
            1299,
            None,
            "meats",
            4.8,
            176,
            true,
            &["seafood", "fish", "protein"],
            &["p19", "p9", "p8"],
        ),
        product(
            "p21",
            "Dish Soap",
            "Effective and eco-friendly dish soap. Cuts through grease while being gentle on \
             your hands and the environment.",
            349,
            None,
            "household",
            4.3,
            98,
            false,
            &["household", "cleaning"],
            &["p22", "p11", "p16"],
        ),
        product(
            "p22",
            "Paper Towels",
            "Absorbent and durable paper towels. Perfect for cleaning spills and everyday \
             messes.",
            599,
            Some(499),
            "household",
            4.2,
            87,
            false,
            &["household", "paper products"],
            &["p21", "p16", "p17"],
        ),
    ];

    for product in &mut products {
        product.price.currency_code = currency;
        if let Some(discounted) = &mut product.discount_price {
            discounted.currency_code = currency;
        }
    }
    products
}
