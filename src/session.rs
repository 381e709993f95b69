//! Per-shopper cart sessions keyed by an opaque id.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use thiserror::Error;
use tokio::{sync::Mutex, time::Instant};

use crate::{
    checkout::CartSession,
    persistence::{PersistError, ScopedSnapshots, SnapshotStore},
};

const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid session id")]
    InvalidId,

    #[error("Session storage unavailable")]
    Storage(#[from] PersistError),
}

pub type SharedSession = Arc<Mutex<CartSession>>;

/// Bounds on how many sessions stay in memory and for how long.
///
/// Evicted sessions are reloaded from their snapshots on next use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub capacity: usize,
    pub idle: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            idle: Duration::from_secs(30 * 60),
        }
    }
}

struct Entry {
    session: SharedSession,
    last_used: Instant,
}

impl Entry {
    /// A request still holds a clone of the session.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.session) > 1
    }
}

/// Open sessions; each one is loaded from its snapshots on first use.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, Entry>>,
    snapshots: Arc<dyn SnapshotStore>,
    limits: SessionLimits,
}

fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl SessionRegistry {
    pub fn new(snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            snapshots,
            limits: SessionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = SessionLimits {
            capacity: limits.capacity.max(1),
            ..limits
        };
        self
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session(&self, id: &str) -> Result<SharedSession, SessionError> {
        if !valid_id(id) {
            return Err(SessionError::InvalidId);
        }
        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.last_used = Instant::now();
            return Ok(entry.session.clone());
        }

        self.evict();
        let scoped = Arc::new(ScopedSnapshots::new(self.snapshots.clone(), id));
        let opened = Arc::new(Mutex::new(CartSession::open(scoped)?));
        tracing::debug!(session = id, "cart session opened");
        let session = self
            .sessions
            .entry(id.to_string())
            .or_insert(Entry {
                session: opened,
                last_used: Instant::now(),
            })
            .session
            .clone();
        Ok(session)
    }

    /// Drop idle sessions, then the least recently used ones until there is
    /// room for one more. Sessions held by a request are never dropped.
    fn evict(&self) {
        let now = Instant::now();
        let idle = self.limits.idle;
        self.sessions
            .retain(|_, entry| entry.in_use() || now.duration_since(entry.last_used) < idle);

        while self.sessions.len() >= self.limits.capacity {
            let oldest = self
                .sessions
                .iter()
                .filter(|entry| !entry.value().in_use())
                .min_by_key(|entry| entry.value().last_used)
                .map(|entry| entry.key().clone());
            let Some(id) = oldest else { break };
            self.sessions.remove_if(&id, |_, entry| !entry.in_use());
            tracing::debug!(session = %id, "cart session evicted");
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{cart::NewCartItem, persistence::MemorySnapshots};

    #[test]
    fn rejects_path_like_ids() {
        let registry = SessionRegistry::new(Arc::new(MemorySnapshots::new()));
        assert!(matches!(registry.session("../etc"), Err(SessionError::InvalidId)));
        assert!(matches!(registry.session(""), Err(SessionError::InvalidId)));
        assert!(registry.session("abc-123_x").is_ok());
    }

    #[tokio::test]
    async fn sessions_reload_from_snapshots() {
        let snapshots: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshots::new());
        let registry = SessionRegistry::new(snapshots.clone());
        {
            let session = registry.session("shopper-1").expect("session");
            let mut session = session.lock().await;
            session
                .add_to_cart(NewCartItem {
                    product_id: 1,
                    name: "Beanie".into(),
                    price: Decimal::from(15),
                    discounted_price: None,
                    image: String::new(),
                    color: None,
                    color_hex: None,
                    size: None,
                    quantity: Some(2),
                    in_stock: true,
                })
                .expect("in stock");
        }

        let restarted = SessionRegistry::new(snapshots);
        let session = restarted.session("shopper-1").expect("session");
        assert_eq!(session.lock().await.total_items(), 2);

        let other = restarted.session("shopper-2").expect("session");
        assert_eq!(other.lock().await.total_items(), 0);
    }

    fn sneakers(quantity: u32) -> NewCartItem {
        NewCartItem {
            product_id: 7,
            name: "Sneakers".into(),
            price: Decimal::from(50),
            discounted_price: None,
            image: String::new(),
            color: None,
            color_hex: None,
            size: None,
            quantity: Some(quantity),
            in_stock: true,
        }
    }

    fn limited(capacity: usize, idle_secs: u64) -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemorySnapshots::new())).with_limits(SessionLimits {
            capacity,
            idle: Duration::from_secs(idle_secs),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted() {
        let registry = limited(100, 60);
        registry.session("early").expect("session");

        tokio::time::advance(Duration::from_secs(61)).await;
        registry.session("late").expect("session");

        assert_eq!(registry.len(), 1);
        assert!(!registry.sessions.contains_key("early"));
    }

    #[tokio::test(start_paused = true)]
    async fn recent_use_keeps_a_session_alive() {
        let registry = limited(100, 60);
        registry.session("regular").expect("session");

        tokio::time::advance(Duration::from_secs(40)).await;
        registry.session("regular").expect("session");
        tokio::time::advance(Duration::from_secs(40)).await;
        registry.session("other").expect("session");

        assert!(registry.sessions.contains_key("regular"));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_evicts_least_recently_used() {
        let registry = limited(2, 3600);
        for id in ["a", "b", "c"] {
            registry.session(id).expect("session");
            tokio::time::advance(Duration::from_secs(1)).await;
        }

        assert_eq!(registry.len(), 2);
        assert!(!registry.sessions.contains_key("a"));
        assert!(registry.sessions.contains_key("c"));
    }

    #[tokio::test(start_paused = true)]
    async fn held_sessions_are_not_evicted() {
        let registry = limited(1, 1);
        let held = registry.session("busy").expect("session");

        tokio::time::advance(Duration::from_secs(5)).await;
        registry.session("next").expect("session");

        assert!(registry.sessions.contains_key("busy"));
        drop(held);
    }

    #[tokio::test(start_paused = true)]
    async fn evicted_session_reloads_from_snapshots() {
        let registry = limited(100, 60);
        {
            let session = registry.session("shopper-9").expect("session");
            session
                .lock()
                .await
                .add_to_cart(sneakers(3))
                .expect("in stock");
        }

        tokio::time::advance(Duration::from_secs(120)).await;
        registry.session("someone-else").expect("session");
        assert!(!registry.sessions.contains_key("shopper-9"));

        let session = registry.session("shopper-9").expect("session");
        assert_eq!(session.lock().await.total_items(), 3);
    }
}
