use serde::{Deserialize, Serialize};

/// One product line in the cart.
///
/// `id` is the lookup key for every mutation and is unique within the
/// collection. The remaining product fields are opaque display data: the
/// store never validates titles, prices, or image references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique product identifier.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Reference to an image resource.
    pub image_url: String,
    /// Unit price. No currency handling.
    pub price: f64,
    /// Always >= 1; an item that would reach 0 is removed instead.
    pub quantity: u32,
}

/// A product being added to the cart: everything but the quantity.
///
/// The store assigns quantity 1 on first insert and folds repeat adds of the
/// same `id` into the existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewCartItem {
    /// Materialize the first cart line for this product.
    pub fn into_item(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}
