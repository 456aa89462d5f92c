//! Domain types for the storefront core.

pub mod cart;
pub mod session;
pub mod user;

pub use cart::{CartLine, CartLineInput, VariantKey};
pub use session::{Session, TokenPair};
pub use user::UserRecord;
