//! Stateful services: the session and cart stores.

pub mod cart;
pub mod session;
