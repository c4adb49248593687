//! Visitor storage backed by the tower-sessions session.
//!
//! The session plays the role browser local storage plays for a
//! client-side cart: one key-value area per visitor, holding the `cart`,
//! `checkoutFormData`, and `visitorState` keys as JSON strings.

use agency_core::{CartStore, DraftStore, KeyValueStore, StorageError, VisitorStore};
use tower_sessions::Session;

/// [`KeyValueStore`] over a visitor's session.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

fn backend(e: &tower_sessions::session::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

impl KeyValueStore for SessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| backend(&e))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| backend(&e))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session
            .remove::<String>(key)
            .await
            .map(|_| ())
            .map_err(|e| backend(&e))
    }
}

/// Open the visitor's cart.
pub async fn cart_store(session: &Session) -> CartStore<SessionStorage> {
    CartStore::open(SessionStorage::new(session.clone())).await
}

/// Open the visitor's checkout draft.
pub async fn draft_store(session: &Session) -> DraftStore<SessionStorage> {
    DraftStore::open(SessionStorage::new(session.clone())).await
}

/// Open the visitor's UI state.
pub async fn visitor_store(session: &Session) -> VisitorStore<SessionStorage> {
    VisitorStore::open(SessionStorage::new(session.clone())).await
}
