//! Cart pricing scenarios against the seeded catalog.

#![allow(clippy::unwrap_used)]

use quickbasket_core::{CurrencyCode, Price, ProductId};
use quickbasket_integration_tests::TestContext;
use quickbasket_storefront::cart::CartSession;
use quickbasket_storefront::config::StorefrontConfig;
use quickbasket_storefront::models::Product;
use quickbasket_storefront::storage::keys;

fn product(ctx: &TestContext, id: &str) -> Product {
    ctx.state
        .catalog()
        .product_by_id(&ProductId::new(id))
        .unwrap()
        .clone()
}

#[test]
fn small_cart_pays_flat_shipping() {
    let ctx = TestContext::in_memory();
    let repo = ctx.state.repository();
    let mut cart = CartSession::restore(repo).unwrap();

    // p1 Organic Bananas: 2.99 discounted to 1.99
    cart.add(product(&ctx, "p1"), 2).unwrap();
    let snapshot = cart.cart();
    assert_eq!(snapshot.subtotal(), Price::from_cents(398, CurrencyCode::USD));
    assert_eq!(
        snapshot.shipping_fee(),
        Price::from_cents(499, CurrencyCode::USD)
    );
    assert_eq!(snapshot.total(), Price::from_cents(897, CurrencyCode::USD));
}

#[test]
fn large_cart_ships_free_and_takes_promo() {
    let ctx = TestContext::in_memory();
    let repo = ctx.state.repository();
    let mut cart = CartSession::restore(repo).unwrap();

    // p20 Salmon Fillet: 12.99, no discount; 5 x 12.99 = 64.95 > 50
    cart.add(product(&ctx, "p20"), 5).unwrap();
    cart.apply_promo_code("SUMMER20").unwrap();

    let snapshot = cart.cart();
    assert_eq!(
        snapshot.subtotal(),
        Price::from_cents(6495, CurrencyCode::USD)
    );
    assert!(snapshot.shipping_fee().is_zero());
    // 20% of 64.95 = 12.99
    assert_eq!(
        snapshot.discount_amount(),
        Price::from_cents(1299, CurrencyCode::USD)
    );
    assert_eq!(snapshot.total(), Price::from_cents(5196, CurrencyCode::USD));
}

#[test]
fn emptying_the_cart_zeroes_everything() {
    let ctx = TestContext::in_memory();
    let repo = ctx.state.repository();
    let mut cart = CartSession::restore(repo).unwrap();

    cart.add(product(&ctx, "p20"), 5).unwrap();
    cart.apply_promo_code("WELCOME10").unwrap();
    cart.update_quantity(&ProductId::new("p20"), 0).unwrap();

    let snapshot = cart.cart();
    assert!(snapshot.is_empty());
    assert!(snapshot.subtotal().is_zero());
    assert!(snapshot.shipping_fee().is_zero());
    assert!(snapshot.total().is_zero());
}

#[test]
fn configured_currency_prices_the_catalog_and_totals() {
    let config = StorefrontConfig {
        currency: CurrencyCode::EUR,
        ..StorefrontConfig::default()
    };
    let ctx = TestContext::in_memory_with_config(config);

    for p in ctx.state.catalog().products() {
        assert_eq!(p.price.currency_code, CurrencyCode::EUR, "product {}", p.id);
        if let Some(discounted) = &p.discount_price {
            assert_eq!(discounted.currency_code, CurrencyCode::EUR);
        }
    }

    let mut cart = CartSession::restore(ctx.state.repository()).unwrap();
    cart.add(product(&ctx, "p1"), 1).unwrap();
    assert_eq!(
        cart.cart().subtotal(),
        Price::from_cents(199, CurrencyCode::EUR)
    );
    assert_eq!(
        cart.cart().shipping_fee(),
        Price::from_cents(499, CurrencyCode::EUR)
    );
}

#[test]
fn persisted_cart_document_keeps_the_wire_shape() {
    let ctx = TestContext::in_memory();
    let repo = ctx.state.repository();
    let mut cart = CartSession::restore(repo).unwrap();
    cart.add(product(&ctx, "p1"), 2).unwrap();
    cart.apply_promo_code("SUMMER20").unwrap();

    let raw = repo.get(keys::CART).unwrap().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["items"][0]["quantity"], 2);
    assert_eq!(doc["items"][0]["product"]["discountPrice"]["amount"], "1.99");
    assert_eq!(doc["promo"]["code"], "SUMMER20");
    assert_eq!(doc["promo"]["discountPercentage"], 20);
}

#[test]
fn cart_survives_a_restart() {
    let ctx = TestContext::file_backed();
    {
        let repo = ctx.state.repository();
        let mut cart = CartSession::restore(repo).unwrap();
        cart.add(product(&ctx, "p1"), 3).unwrap();
        cart.apply_promo_code("FLASH50").unwrap();
    }

    let reopened = ctx.reopen();
    let cart = CartSession::restore(reopened.repository()).unwrap();
    assert_eq!(cart.cart().total_items(), 3);
    assert_eq!(cart.cart().promo.as_ref().unwrap().code, "FLASH50");
    assert_eq!(cart.cart().promo.as_ref().unwrap().discount_percentage, 50);
}
