//! QuickBasket Storefront - scripted demo session.
//!
//! Runs one full storefront session against the JSON-file repository:
//! restore (or create) the demo login, browse the catalog, fill the cart,
//! apply a promo code, walk the checkout steps, place the order, and then
//! drive the order-tracking simulator until delivery or Ctrl+C.
//!
//! State persists under the configured data directory, so a second run
//! starts from the previous session's user and order history.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quickbasket_core::{PaymentMethod, ProductId};
use quickbasket_storefront::account::AccountService;
use quickbasket_storefront::cart::CartSession;
use quickbasket_storefront::checkout::CheckoutFlow;
use quickbasket_storefront::config::StorefrontConfig;
use quickbasket_storefront::error::{AppError, Result};
use quickbasket_storefront::models::NewAddress;
use quickbasket_storefront::state::AppState;
use quickbasket_storefront::tracking::TrackingSimulator;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quickbasket_storefront=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(config).expect("Failed to initialize application state");

    if let Err(err) = run_session(&state).await {
        tracing::error!(error = %err, "demo session failed");
        std::process::exit(1);
    }
}

/// One scripted end-to-end session.
async fn run_session(state: &AppState) -> Result<()> {
    let repo = state.repository();
    let catalog = state.catalog();

    // --- session -----------------------------------------------------------
    let mut account = AccountService::restore(repo)?;
    match account.current_user() {
        Some(user) => tracing::info!(user = %user.name, "restored previous session"),
        None => {
            let user = account.login("demo@example.com", "password")?;
            tracing::info!(user = %user.name, "logged in");
        }
    }

    // --- browse ------------------------------------------------------------
    for product in catalog.featured_products() {
        tracing::info!(
            id = %product.id,
            name = %product.name,
            price = %product.effective_price(),
            "featured product"
        );
    }
    let hits = catalog.search("organic");
    tracing::info!(query = "organic", hits = hits.len(), "catalog search");

    // --- cart --------------------------------------------------------------
    let mut cart = CartSession::restore(repo)?;
    if !cart.cart().is_empty() {
        tracing::info!(items = cart.cart().total_items(), "found a saved cart, starting fresh");
        cart.clear()?;
    }

    let bananas = find_product(state, "p1")?;
    let salmon = find_product(state, "p20")?;
    let milk = find_product(state, "p6")?;

    cart.add(bananas, 2)?;
    cart.add(salmon.clone(), 1)?;
    cart.add(milk, 1)?;
    // changed our mind about the milk
    cart.update_quantity(&ProductId::new("p6"), 0)?;
    cart.apply_promo_code("WELCOME10")?;

    let snapshot = cart.cart();
    tracing::info!(
        items = snapshot.total_items(),
        subtotal = %snapshot.subtotal(),
        shipping = %snapshot.shipping_fee(),
        discount = %snapshot.discount_amount(),
        total = %snapshot.total(),
        "cart ready for checkout"
    );

    // --- wishlist and addresses --------------------------------------------
    if !account.is_in_wishlist(&salmon.id) {
        account.add_to_wishlist(salmon)?;
    }
    if account
        .current_user()
        .is_some_and(|u| u.addresses.len() < 2)
    {
        let office = account.add_address(NewAddress {
            name: "Office".to_owned(),
            line1: "456 Oak Ave".to_owned(),
            line2: Some("Suite 12".to_owned()),
            city: "Anytown".to_owned(),
            state: "State".to_owned(),
            postal_code: "12346".to_owned(),
            country: "Country".to_owned(),
            is_default: false,
        })?;
        tracing::info!(address_id = %office, "added office address");
    }

    // --- checkout ----------------------------------------------------------
    let mut flow = CheckoutFlow::new();
    let default_address = account
        .current_user()
        .and_then(|u| u.default_address())
        .map(|a| a.id.clone())
        .ok_or_else(|| AppError::NotFound("default address".to_owned()))?;
    {
        let user = account
            .current_user()
            .ok_or_else(|| AppError::NotFound("session user".to_owned()))?;
        flow.submit_delivery(user, &default_address)?;
    }
    flow.submit_payment(PaymentMethod::CreditCard)?;
    let order = flow.place_order(&mut cart, &mut account, repo, Utc::now())?;
    tracing::info!(
        order_id = %order.id,
        total = %order.total_amount,
        estimated_delivery = %order.estimated_delivery,
        "order placed"
    );

    // --- tracking ----------------------------------------------------------
    let simulator = TrackingSimulator::new(
        state.repository_handle(),
        order.id.clone(),
        state.config().tracking_interval,
    );
    tokio::select! {
        result = simulator.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(order_id = %order.id, "interrupted, tracking state saved");
        }
    }

    Ok(())
}

fn find_product(state: &AppState, id: &str) -> Result<quickbasket_storefront::models::Product> {
    let id = ProductId::new(id);
    state
        .catalog()
        .product_by_id(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
