//! Persistent shopping-cart state container for local storefront apps.
//!
//! The cart is an ordered collection of product lines keyed by product id,
//! mutated through three operations (add, increment, decrement) and persisted
//! write-through as JSON to a local key-value store after every mutation.
//!
//! [`cart::CartStore`] hands out cheap cloneable handles; all mutations are
//! serialized through a single worker task, and UI layers can either poll
//! [`cart::CartStore::products`] or react to [`cart::CartStore::subscribe`]
//! snapshots.
//!
//! ```no_run
//! use marketcart::cart::{CartStore, NewCartItem};
//! use marketcart::storage::FileStorage;
//!
//! # async fn demo() -> Result<(), marketcart::cart::CartError> {
//! let store = CartStore::open(FileStorage::new(FileStorage::default_root())).await;
//! store
//!     .add_to_cart(NewCartItem {
//!         id: "p1".to_string(),
//!         title: "Shirt".to_string(),
//!         image_url: "https://img.example/shirt.png".to_string(),
//!         price: 10.0,
//!     })
//!     .await?;
//! store.increment("p1").await?;
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod logging;
pub mod storage;
