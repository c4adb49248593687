//! Write-through stores for the cart, checkout draft, and visitor state.
//!
//! Each store hydrates once from its key when opened and rewrites the key
//! after every operation, so the persisted JSON always deserializes to the
//! in-memory value. Operations never fail; see [`crate::persist`].

use rust_decimal::Decimal;

use crate::cart::{Cart, CartItem, ItemPatch, NewCartItem};
use crate::checkout::{CheckoutDraft, DraftError, DraftPatch};
use crate::persist::Persisted;
use crate::storage::{
    CART_KEY, CHECKOUT_DRAFT_KEY, KeyValueStore, StorageError, VISITOR_STATE_KEY,
};
use crate::types::ServiceId;
use crate::visitor::VisitorState;

/// The visitor's cart, mirrored to the `cart` key.
#[derive(Debug)]
pub struct CartStore<S> {
    inner: Persisted<S, Cart>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Hydrate the cart from storage.
    pub async fn open(storage: S) -> Self {
        let mut inner: Persisted<S, Cart> = Persisted::open(storage, CART_KEY).await;
        // Persisted carts are not trusted to hold the invariants.
        let normalized = inner.get().clone().normalized();
        if &normalized != inner.get() {
            tracing::warn!("Persisted cart violated invariants; normalizing");
            inner.update(|cart| *cart = normalized).await;
        }
        Self { inner }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.inner.get()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart().items()
    }

    /// Add a line or increase an existing line's quantity.
    pub async fn add_item(&mut self, item: NewCartItem) {
        tracing::debug!(id = %item.id, quantity = item.contributed_quantity(), "Adding to cart");
        self.inner.update(|cart| cart.add_item(item)).await;
    }

    /// Remove a line; absent ids are a no-op.
    pub async fn remove_item(&mut self, id: &ServiceId) {
        self.inner
            .update(|cart| {
                cart.remove_item(id);
            })
            .await;
    }

    /// Set a line's quantity; `quantity <= 0` removes it.
    pub async fn set_quantity(&mut self, id: &ServiceId, quantity: i64) {
        self.inner
            .update(|cart| {
                cart.set_quantity(id, quantity);
            })
            .await;
    }

    /// Merge annotation fields into a line; absent ids are a no-op.
    pub async fn patch_item(&mut self, id: &ServiceId, patch: ItemPatch) {
        self.inner
            .update(|cart| {
                cart.patch_item(id, patch);
            })
            .await;
    }

    /// Empty the cart.
    pub async fn clear(&mut self) {
        self.inner.update(Cart::clear).await;
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart().total()
    }

    #[must_use]
    pub fn has_custom_quote(&self) -> bool {
        self.cart().has_custom_quote()
    }

    /// Failure from the last write, if it did not reach storage.
    #[must_use]
    pub const fn persist_warning(&self) -> Option<&StorageError> {
        self.inner.last_error()
    }

    pub fn into_storage(self) -> S {
        self.inner.into_storage()
    }
}

/// The checkout draft, mirrored to the `checkoutFormData` key.
#[derive(Debug)]
pub struct DraftStore<S> {
    inner: Persisted<S, CheckoutDraft>,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub async fn open(storage: S) -> Self {
        Self {
            inner: Persisted::open(storage, CHECKOUT_DRAFT_KEY).await,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &CheckoutDraft {
        self.inner.get()
    }

    /// Merge the provided fields and write through.
    pub async fn update(&mut self, patch: DraftPatch) {
        self.inner.update(|draft| draft.merge(patch)).await;
    }

    /// Discard the draft.
    pub async fn clear(&mut self) {
        self.inner.reset().await;
    }

    /// Gate for moving on to payment.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::MissingFields`] if required fields are blank.
    pub fn validate(&self) -> Result<(), DraftError> {
        self.draft().validate()
    }

    #[must_use]
    pub const fn persist_warning(&self) -> Option<&StorageError> {
        self.inner.last_error()
    }
}

/// Visitor UI state, mirrored to the `visitorState` key.
#[derive(Debug)]
pub struct VisitorStore<S> {
    inner: Persisted<S, VisitorState>,
}

impl<S: KeyValueStore> VisitorStore<S> {
    pub async fn open(storage: S) -> Self {
        Self {
            inner: Persisted::open(storage, VISITOR_STATE_KEY).await,
        }
    }

    #[must_use]
    pub const fn state(&self) -> VisitorState {
        *self.inner.get()
    }

    /// Mark the intro as played. Returns `true` if this call is the first,
    /// i.e. the caller should play it now.
    pub async fn take_intro(&mut self) -> bool {
        if self.inner.get().intro_played {
            return false;
        }
        self.inner.update(|state| state.intro_played = true).await;
        true
    }
}
