//! Session middleware configuration.
//!
//! Each visitor gets a cookie-identified session that holds their cart,
//! checkout draft, and UI state. Sessions live in process memory and expire
//! after a period of inactivity; a background sweep drops expired records.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "agency_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// How often expired sessions are swept.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-process session store that can delete expired records.
///
/// Cheaply cloneable; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct VisitorSessionStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

impl VisitorSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, expired or not.
    pub async fn session_count(&self) -> usize {
        self.records.lock().await.len()
    }

    async fn sweep(&self) -> usize {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| is_active(record));
        before - records.len()
    }

    /// Sweep expired records every `period` until the store is dropped.
    ///
    /// The task holds only a weak reference, so it ends once the session
    /// layer (and every other clone) is gone.
    #[must_use = "dropping the handle detaches the sweep task"]
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let records = Arc::downgrade(&self.records);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(records) = records.upgrade() else {
                    break;
                };
                let removed = Self { records }.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired sessions");
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for VisitorSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .lock()
            .await
            .get(session_id)
            .filter(|record| is_active(record))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for VisitorSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        self.sweep().await;
        Ok(())
    }
}

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer(
    store: VisitorSessionStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<VisitorSessionStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record(expires_in: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_load_skips_expired() {
        let store = VisitorSessionStore::new();
        let live = record(TimeDuration::hours(1));
        let stale = record(TimeDuration::hours(-1));
        store.save(&live).await.unwrap();
        store.save(&stale).await.unwrap();

        assert!(store.load(&live.id).await.unwrap().is_some());
        assert!(store.load(&stale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live() {
        let store = VisitorSessionStore::new();
        let live = record(TimeDuration::hours(1));
        store.save(&live).await.unwrap();
        for _ in 0..3 {
            store.save(&record(TimeDuration::seconds(-5))).await.unwrap();
        }
        assert_eq!(store.session_count().await, 4);

        store.delete_expired().await.unwrap();
        assert_eq!(store.session_count().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_avoids_id_collision() {
        let store = VisitorSessionStore::new();
        let existing = record(TimeDuration::hours(1));
        store.save(&existing).await.unwrap();

        let mut incoming = existing.clone();
        store.create(&mut incoming).await.unwrap();
        assert_ne!(incoming.id, existing.id);
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired() {
        let store = VisitorSessionStore::new();
        store.save(&record(TimeDuration::seconds(-1))).await.unwrap();

        let handle = store.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.session_count().await, 0);

        drop(store);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
