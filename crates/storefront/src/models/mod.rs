//! Domain models shared across the storefront modules.

pub mod order;
pub mod product;
pub mod user;

pub use order::Order;
pub use product::{Category, Product, Specification};
pub use user::{Address, NewAddress, User};
