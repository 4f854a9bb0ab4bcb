use thiserror::Error;

use crate::storage::StorageError;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Increment/decrement targeted an id that is not in the cart.
    ///
    /// Quantity-0 items never exist in the collection, so decrementing one
    /// surfaces the same way.
    #[error("no cart item with id '{id}'")]
    ItemNotFound { id: String },

    /// The handle outlived the store worker. Indicates an integration bug:
    /// the runtime hosting the store was torn down while a handle was kept.
    #[error("cart store is closed")]
    StoreClosed,

    /// Persisting the cart failed. The in-memory mutation was still applied;
    /// memory remains the source of truth for the session.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),

    /// The cart snapshot could not be encoded as JSON.
    #[error("failed to encode cart snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
