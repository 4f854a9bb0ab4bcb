//! Cart state container with write-through persistence.
//!
//! The collection is owned by a single worker task; handles submit mutations
//! over a command channel and await the result. That serializes every
//! mutation *and* its persistence write, so two rapid UI events can never
//! interleave their in-memory updates or write snapshots out of order.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use super::error::CartError;
use super::types::{CartItem, NewCartItem};
use crate::storage::CartStorage;

/// Fixed storage key for the persisted cart snapshot.
///
/// Load and every write go through this one constant.
pub const CART_STORAGE_KEY: &str = "@marketcart:products";

const COMMAND_BUFFER: usize = 16;

enum CartCommand {
    Add {
        item: NewCartItem,
        respond_to: oneshot::Sender<Result<(), CartError>>,
    },
    Increment {
        id: String,
        respond_to: oneshot::Sender<Result<(), CartError>>,
    },
    Decrement {
        id: String,
        respond_to: oneshot::Sender<Result<(), CartError>>,
    },
}

/// Handle to the cart store.
///
/// Cheap to clone; all clones talk to the same worker and observe the same
/// collection. The worker shuts down when the last handle is dropped.
#[derive(Clone)]
pub struct CartStore {
    sender: mpsc::Sender<CartCommand>,
    snapshot: watch::Receiver<Vec<CartItem>>,
}

impl CartStore {
    /// Open the store over `storage`, loading any previously persisted cart.
    ///
    /// A missing key starts an empty cart. A malformed or unreadable
    /// persisted value is logged and also starts empty; the cart is
    /// convenience state and must not block startup.
    pub async fn open(storage: impl CartStorage + 'static) -> Self {
        Self::open_shared(Arc::new(storage)).await
    }

    /// Like [`CartStore::open`] for an already-shared storage handle.
    pub async fn open_shared(storage: Arc<dyn CartStorage>) -> Self {
        let items = load_snapshot(storage.as_ref()).await;

        let (snapshot_tx, snapshot_rx) = watch::channel(items.clone());
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);

        let worker = CartWorker {
            receiver,
            items,
            storage,
            snapshot: snapshot_tx,
        };
        tokio::spawn(worker.run());

        Self {
            sender,
            snapshot: snapshot_rx,
        }
    }

    /// Add a product to the cart.
    ///
    /// If the product is already in the cart its quantity goes up by one (no
    /// duplicate line is inserted); otherwise it is appended with quantity 1.
    /// Resolves once the updated cart has been persisted.
    ///
    /// # Errors
    /// [`CartError::Storage`] if the persistence write failed. The in-memory
    /// cart keeps the mutation either way.
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<(), CartError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(CartCommand::Add { item, respond_to })
            .await
            .map_err(|_| CartError::StoreClosed)?;
        receiver.await.map_err(|_| CartError::StoreClosed)?
    }

    /// Increase the quantity of the item with `id` by one.
    ///
    /// # Errors
    /// [`CartError::ItemNotFound`] if `id` is not in the cart; the collection
    /// is left untouched. [`CartError::Storage`] as for
    /// [`CartStore::add_to_cart`].
    pub async fn increment(&self, id: impl Into<String>) -> Result<(), CartError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(CartCommand::Increment {
                id: id.into(),
                respond_to,
            })
            .await
            .map_err(|_| CartError::StoreClosed)?;
        receiver.await.map_err(|_| CartError::StoreClosed)?
    }

    /// Decrease the quantity of the item with `id` by one, removing the item
    /// entirely when it reaches zero.
    ///
    /// # Errors
    /// Same as [`CartStore::increment`].
    pub async fn decrement(&self, id: impl Into<String>) -> Result<(), CartError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(CartCommand::Decrement {
                id: id.into(),
                respond_to,
            })
            .await
            .map_err(|_| CartError::StoreClosed)?;
        receiver.await.map_err(|_| CartError::StoreClosed)?
    }

    /// Snapshot of the current cart, in insertion order.
    pub fn products(&self) -> Vec<CartItem> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to cart snapshots.
    ///
    /// The receiver holds the latest collection and is notified on every
    /// mutation; UI layers can await `changed()` and re-render.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.snapshot.clone()
    }
}

/// Read and decode the persisted cart, falling back to empty.
async fn load_snapshot(storage: &dyn CartStorage) -> Vec<CartItem> {
    let bytes = match storage.get(CART_STORAGE_KEY).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "persisted cart is malformed, starting empty");
            Vec::new()
        }
    }
}

/// Single owner of the cart collection.
///
/// Runs until every [`CartStore`] handle is dropped.
struct CartWorker {
    receiver: mpsc::Receiver<CartCommand>,
    items: Vec<CartItem>,
    storage: Arc<dyn CartStorage>,
    snapshot: watch::Sender<Vec<CartItem>>,
}

impl CartWorker {
    async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                CartCommand::Add { item, respond_to } => {
                    let result = self.add(item).await;
                    if respond_to.send(result).is_err() {
                        tracing::trace!("cart: add response dropped (caller gone)");
                    }
                }
                CartCommand::Increment { id, respond_to } => {
                    let result = self.increment(&id).await;
                    if respond_to.send(result).is_err() {
                        tracing::trace!("cart: increment response dropped (caller gone)");
                    }
                }
                CartCommand::Decrement { id, respond_to } => {
                    let result = self.decrement(&id).await;
                    if respond_to.send(result).is_err() {
                        tracing::trace!("cart: decrement response dropped (caller gone)");
                    }
                }
            }
        }
    }

    async fn add(&mut self, item: NewCartItem) -> Result<(), CartError> {
        if let Some(index) = self.items.iter().position(|i| i.id == item.id) {
            self.items[index].quantity += 1;
        } else {
            self.items.push(item.into_item());
        }
        self.publish_and_persist().await
    }

    async fn increment(&mut self, id: &str) -> Result<(), CartError> {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => item.quantity += 1,
            None => {
                return Err(CartError::ItemNotFound { id: id.to_string() });
            }
        }
        self.publish_and_persist().await
    }

    async fn decrement(&mut self, id: &str) -> Result<(), CartError> {
        let Some(index) = self.items.iter().position(|i| i.id == id) else {
            return Err(CartError::ItemNotFound { id: id.to_string() });
        };

        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            // Quantity 1: the item leaves the cart; quantity 0 is never kept.
            self.items.remove(index);
        }
        self.publish_and_persist().await
    }

    /// Publish the new snapshot, then write it through to storage.
    ///
    /// Observers see the update even when the write fails: memory is the
    /// source of truth for the session, a failed write only risks a stale
    /// cart on the next launch.
    async fn publish_and_persist(&mut self) -> Result<(), CartError> {
        self.snapshot.send_replace(self.items.clone());

        let bytes = serde_json::to_vec(&self.items)?;
        if let Err(e) = self.storage.set(CART_STORAGE_KEY, bytes).await {
            tracing::error!(error = %e, "failed to persist cart, keeping in-memory state");
            return Err(CartError::Storage(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn new_item(id: &str) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            title: format!("Product {id}"),
            image_url: format!("https://img.example/{id}.png"),
            price: 9.99,
        }
    }

    fn test_worker() -> CartWorker {
        let (_sender, receiver) = mpsc::channel(1);
        let (snapshot, _) = watch::channel(Vec::new());
        CartWorker {
            receiver,
            items: Vec::new(),
            storage: Arc::new(MemoryStorage::new()),
            snapshot,
        }
    }

    #[tokio::test]
    async fn add_folds_duplicate_ids_into_one_line() {
        let mut worker = test_worker();
        worker.add(new_item("p1")).await.unwrap();
        worker.add(new_item("p1")).await.unwrap();

        assert_eq!(worker.items.len(), 1);
        assert_eq!(worker.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn add_preserves_insertion_order() {
        let mut worker = test_worker();
        worker.add(new_item("p1")).await.unwrap();
        worker.add(new_item("p2")).await.unwrap();
        worker.add(new_item("p1")).await.unwrap();

        let ids: Vec<&str> = worker.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[tokio::test]
    async fn decrement_at_quantity_one_removes_item() {
        let mut worker = test_worker();
        worker.add(new_item("p1")).await.unwrap();
        worker.decrement("p1").await.unwrap();

        assert!(worker.items.is_empty());
    }

    #[tokio::test]
    async fn mutations_on_unknown_id_leave_state_untouched() {
        let mut worker = test_worker();
        worker.add(new_item("p1")).await.unwrap();

        assert!(matches!(
            worker.increment("ghost").await,
            Err(CartError::ItemNotFound { .. })
        ));
        assert!(matches!(
            worker.decrement("ghost").await,
            Err(CartError::ItemNotFound { .. })
        ));
        assert_eq!(worker.items.len(), 1);
        assert_eq!(worker.items[0].quantity, 1);
    }
}
