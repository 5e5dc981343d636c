//! End-to-end checkout: browse, fill the cart, walk the steps, place the
//! order, and confirm every persisted side effect.

#![allow(clippy::unwrap_used)]

use chrono::Utc;

use quickbasket_core::{OrderStatus, PaymentMethod, ProductId};
use quickbasket_integration_tests::TestContext;
use quickbasket_storefront::account::AccountService;
use quickbasket_storefront::cart::CartSession;
use quickbasket_storefront::checkout::{CheckoutFlow, CheckoutStep};
use quickbasket_storefront::storage::RepositoryExt;

#[test]
fn full_checkout_round_trip() {
    let ctx = TestContext::file_backed();
    let repo = ctx.state.repository();

    let mut account = AccountService::restore(repo).unwrap();
    account.login("demo@example.com", "password").unwrap();

    let mut cart = CartSession::restore(repo).unwrap();
    let bananas = ctx
        .state
        .catalog()
        .product_by_id(&ProductId::new("p1"))
        .unwrap()
        .clone();
    let salmon = ctx
        .state
        .catalog()
        .product_by_id(&ProductId::new("p20"))
        .unwrap()
        .clone();
    cart.add(bananas, 2).unwrap();
    cart.add(salmon, 4).unwrap();
    cart.apply_promo_code("WELCOME10").unwrap();
    let expected_total = cart.cart().total();

    let mut flow = CheckoutFlow::new();
    let address_id = account.current_user().unwrap().addresses[0].id.clone();
    flow.submit_delivery(account.current_user().unwrap(), &address_id)
        .unwrap();
    flow.submit_payment(PaymentMethod::CashOnDelivery).unwrap();
    let order = flow
        .place_order(&mut cart, &mut account, repo, Utc::now())
        .unwrap();

    assert_eq!(flow.step(), CheckoutStep::Confirmation);
    assert_eq!(order.total_amount, expected_total);
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);

    // everything survives a restart
    let reopened = ctx.reopen();
    let repo = reopened.repository();

    let account = AccountService::restore(repo).unwrap();
    assert_eq!(account.current_user().unwrap().orders[0].id, order.id);

    let cart = CartSession::restore(repo).unwrap();
    assert!(cart.cart().is_empty());

    let snapshot = repo.load_tracking(&order.id).unwrap().unwrap();
    assert!(!snapshot.is_delivered());
    assert_eq!(repo.load_last_used_address().unwrap().unwrap(), address_id);
}

#[test]
fn two_orders_stack_newest_first() {
    let ctx = TestContext::in_memory();
    let repo = ctx.state.repository();

    let mut account = AccountService::restore(repo).unwrap();
    account.login("demo@example.com", "password").unwrap();
    let product = ctx
        .state
        .catalog()
        .product_by_id(&ProductId::new("p6"))
        .unwrap()
        .clone();

    let mut first_id = None;
    for _ in 0..2 {
        let mut cart = CartSession::restore(repo).unwrap();
        cart.add(product.clone(), 1).unwrap();
        let mut flow = CheckoutFlow::new();
        let address_id = account.current_user().unwrap().addresses[0].id.clone();
        flow.submit_delivery(account.current_user().unwrap(), &address_id)
            .unwrap();
        flow.submit_payment(PaymentMethod::Wallet).unwrap();
        let order = flow
            .place_order(&mut cart, &mut account, repo, Utc::now())
            .unwrap();
        first_id.get_or_insert(order.id);
    }

    let user = account.current_user().unwrap();
    assert_eq!(user.orders.len(), 2);
    assert_eq!(user.orders[1].id, first_id.unwrap());
}
