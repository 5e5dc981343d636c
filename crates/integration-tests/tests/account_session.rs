//! Account, address book, and wishlist scenarios.

#![allow(clippy::unwrap_used)]

use quickbasket_core::ProductId;
use quickbasket_integration_tests::TestContext;
use quickbasket_storefront::account::{AccountError, AccountService};
use quickbasket_storefront::models::NewAddress;

fn new_address(name: &str, is_default: bool) -> NewAddress {
    NewAddress {
        name: name.to_owned(),
        line1: "456 Oak Ave".to_owned(),
        line2: None,
        city: "Springfield".to_owned(),
        state: "State".to_owned(),
        postal_code: "67890".to_owned(),
        country: "Country".to_owned(),
        is_default,
    }
}

#[test]
fn session_survives_a_restart() {
    let ctx = TestContext::file_backed();
    {
        let mut account = AccountService::restore(ctx.state.repository()).unwrap();
        account.login("demo@example.com", "password").unwrap();
        let product = ctx
            .state
            .catalog()
            .product_by_id(&ProductId::new("p3"))
            .unwrap()
            .clone();
        account.add_to_wishlist(product).unwrap();
    }

    let reopened = ctx.reopen();
    let account = AccountService::restore(reopened.repository()).unwrap();
    let user = account.current_user().unwrap();
    assert_eq!(user.name, "Demo User");
    assert!(account.is_in_wishlist(&ProductId::new("p3")));
}

#[test]
fn logout_removes_the_persisted_user() {
    let ctx = TestContext::file_backed();
    {
        let mut account = AccountService::restore(ctx.state.repository()).unwrap();
        account.login("demo@example.com", "password").unwrap();
        account.logout().unwrap();
    }

    let reopened = ctx.reopen();
    let account = AccountService::restore(reopened.repository()).unwrap();
    assert!(!account.is_logged_in());
}

#[test]
fn address_book_keeps_exactly_one_default() {
    let ctx = TestContext::in_memory();
    let mut account = AccountService::restore(ctx.state.repository()).unwrap();
    account.login("demo@example.com", "password").unwrap();

    // canned Home address is the default; pile on more and shuffle
    let office = account.add_address(new_address("Office", false)).unwrap();
    let cabin = account.add_address(new_address("Cabin", true)).unwrap();
    account.set_default_address(&office).unwrap();
    account.remove_address(&office).unwrap();

    let user = account.current_user().unwrap();
    assert_eq!(user.addresses.len(), 2);
    assert_eq!(
        user.addresses.iter().filter(|a| a.is_default).count(),
        1,
        "exactly one default after add/set/remove churn"
    );
    // removing the default promoted the first remaining (Home), not Cabin
    assert_ne!(user.default_address().unwrap().id, cabin);
}

#[test]
fn anonymous_mutations_are_rejected() {
    let ctx = TestContext::in_memory();
    let mut account = AccountService::restore(ctx.state.repository()).unwrap();

    assert!(matches!(
        account.add_address(new_address("Office", false)),
        Err(AccountError::NotLoggedIn)
    ));
    let product = ctx
        .state
        .catalog()
        .product_by_id(&ProductId::new("p1"))
        .unwrap()
        .clone();
    assert!(matches!(
        account.add_to_wishlist(product),
        Err(AccountError::NotLoggedIn)
    ));
}
