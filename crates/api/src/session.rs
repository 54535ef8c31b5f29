//! Session registry: one isolated inventory per session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use stockroom_core::SessionId;
use stockroom_inventory::InventoryStore;

/// Idle time after which an untouched session is discarded.
pub const DEFAULT_IDLE_TTL_SECS: u32 = 30 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A lock guarding session state was poisoned by a panicking holder.
    #[error("session state unavailable")]
    Unavailable,
}

/// A single user's session and the inventory it owns.
#[derive(Debug)]
struct Session {
    started_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    store: InventoryStore,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            last_seen: now,
            store: InventoryStore::new(),
        }
    }

    fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
    }
}

type SharedSession = Arc<Mutex<Session>>;

/// In-memory registry of live sessions.
///
/// Each session sits behind its own mutex, so mutations are serialized per
/// session while different sessions never contend on each other's state.
/// Sessions untouched for longer than the idle TTL are evicted whenever a new
/// session is created.
#[derive(Debug)]
pub struct SessionRegistry {
    inner: RwLock<HashMap<SessionId, SharedSession>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::seconds(i64::from(DEFAULT_IDLE_TTL_SECS)))
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Start a fresh, empty session.
    pub fn start(&self) -> Result<(SessionId, DateTime<Utc>), SessionError> {
        let id = SessionId::new();
        let now = Utc::now();

        let mut map = self.inner.write().map_err(|_| SessionError::Unavailable)?;
        self.evict_idle_locked(&mut map, now);
        map.insert(id, Arc::new(Mutex::new(Session::new(now))));

        tracing::info!(session_id = %id, "session started");
        Ok((id, now))
    }

    /// Run `f` against the session's store, starting the session if it is unknown.
    ///
    /// The session lock is held for the whole of `f`, so a mutation and the
    /// snapshot read that follows it observe the same state.
    pub fn with_store<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut InventoryStore) -> R,
    ) -> Result<R, SessionError> {
        let now = Utc::now();
        let session = self.get_or_start(id, now)?;
        let mut guard = session.lock().map_err(|_| SessionError::Unavailable)?;
        guard.last_seen = now;
        Ok(f(&mut guard.store))
    }

    /// End a session, dropping its inventory. Returns whether it existed.
    pub fn end(&self, id: SessionId) -> Result<bool, SessionError> {
        let mut map = self.inner.write().map_err(|_| SessionError::Unavailable)?;
        let Some(session) = map.remove(&id) else {
            return Ok(false);
        };

        match session.try_lock() {
            Ok(s) => tracing::info!(session_id = %id, started_at = %s.started_at, "session ended"),
            Err(TryLockError::WouldBlock) => tracing::info!(session_id = %id, "session ended while in use"),
            Err(TryLockError::Poisoned(_)) => tracing::warn!(session_id = %id, "poisoned session ended"),
        }
        Ok(true)
    }

    /// Drop every session idle for longer than the TTL as of `now`.
    ///
    /// Returns the number of sessions evicted.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let mut map = self.inner.write().map_err(|_| SessionError::Unavailable)?;
        Ok(self.evict_idle_locked(&mut map, now))
    }

    pub fn contains(&self, id: SessionId) -> Result<bool, SessionError> {
        let map = self.inner.read().map_err(|_| SessionError::Unavailable)?;
        Ok(map.contains_key(&id))
    }

    pub fn len(&self) -> Result<usize, SessionError> {
        let map = self.inner.read().map_err(|_| SessionError::Unavailable)?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.len()? == 0)
    }

    fn get_or_start(&self, id: SessionId, now: DateTime<Utc>) -> Result<SharedSession, SessionError> {
        {
            let map = self.inner.read().map_err(|_| SessionError::Unavailable)?;
            if let Some(session) = map.get(&id) {
                return Ok(Arc::clone(session));
            }
        }

        let mut map = self.inner.write().map_err(|_| SessionError::Unavailable)?;
        if !map.contains_key(&id) {
            self.evict_idle_locked(&mut map, now);
        }
        let session = map.entry(id).or_insert_with(|| {
            tracing::info!(session_id = %id, "session started on first use");
            Arc::new(Mutex::new(Session::new(now)))
        });
        Ok(Arc::clone(session))
    }

    fn evict_idle_locked(&self, map: &mut HashMap<SessionId, SharedSession>, now: DateTime<Utc>) -> usize {
        let ttl = self.idle_ttl;
        let before = map.len();

        map.retain(|id, session| {
            // A handle held outside the map means a request is using it right now.
            if Arc::strong_count(session) > 1 {
                return true;
            }
            let keep = match session.try_lock() {
                Ok(s) => !s.is_idle(now, ttl),
                Err(TryLockError::WouldBlock) => true,
                Err(TryLockError::Poisoned(_)) => false,
            };
            if !keep {
                tracing::info!(session_id = %id, "idle session evicted");
            }
            keep
        });

        before - map.len()
    }
}
