//! QuickBasket Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused: the product catalog, the cart and
//! pricing engine, account state (addresses, wishlist, order history), the
//! multi-step checkout flow, and the simulated order-tracking state machine.
//!
//! All state lives in memory and in a JSON key-value repository; there is
//! no backend, payment processor, or real authentication.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod tracking;
