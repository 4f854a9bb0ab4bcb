//! The cart state container: data model, errors, and the store itself.

mod error;
mod store;
mod types;

pub use error::CartError;
pub use store::{CartStore, CART_STORAGE_KEY};
pub use types::{CartItem, NewCartItem};
