// ABOUTME: In-process store of page sessions keyed by an opaque cookie id
// ABOUTME: Serializes actions per session behind a lock and evicts sessions left idle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum_extra::headers::Cookie;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::session::SessionState;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "idea_session";

/// Sessions untouched for this long are dropped
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
struct SessionSlot {
    state: Arc<Mutex<SessionState>>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            last_seen: Instant::now(),
        }
    }

    /// Nobody holds or waits for the state besides the store itself
    fn is_unused(&self) -> bool {
        Arc::strong_count(&self.state) == 1
    }
}

/// Exclusive access to one session's state for the duration of an action
///
/// Other requests for the same session wait until this is handed back
/// through [`SessionStore::release`] or dropped.
#[derive(Debug)]
pub struct SessionLock {
    id: Uuid,
    guard: OwnedMutexGuard<SessionState>,
}

impl SessionLock {
    /// Session this lock belongs to
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }
}

impl Deref for SessionLock {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        &self.guard
    }
}

impl DerefMut for SessionLock {
    fn deref_mut(&mut self) -> &mut SessionState {
        &mut self.guard
    }
}

/// Sessions of this process; nothing survives a restart
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionSlot>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl: SESSION_IDLE_TTL,
        }
    }
}

impl SessionStore {
    /// Empty store with the default idle timeout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long an untouched session is kept
    #[must_use]
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Session id from the request cookies, if present and well formed
    #[must_use]
    pub fn session_id(cookie: Option<&Cookie>) -> Option<Uuid> {
        cookie
            .and_then(|c| c.get(SESSION_COOKIE))
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    /// `Set-Cookie` value binding the browser to `id`
    #[must_use]
    pub fn set_cookie_header(id: Uuid) -> String {
        format!("{SESSION_COOKIE}={id}; HttpOnly; Path=/; SameSite=Lax")
    }

    /// Copy of the state for rendering
    ///
    /// Waits for an action running on the same session. Unknown ids read as
    /// an empty state and are not stored.
    pub async fn snapshot(&self, id: Uuid) -> SessionState {
        let state = self.sessions.get_mut(&id).map(|mut slot| {
            slot.last_seen = Instant::now();
            Arc::clone(&slot.state)
        });
        match state {
            Some(state) => state.lock().await.clone(),
            None => SessionState::default(),
        }
    }

    /// Wait for exclusive access to the session
    ///
    /// Unknown ids start from an empty state. Creating a session first drops
    /// sessions idle for longer than the timeout.
    pub async fn lock(&self, id: Uuid) -> SessionLock {
        if !self.sessions.contains_key(&id) {
            self.evict_idle();
        }
        let state = {
            let mut slot = self.sessions.entry(id).or_insert_with(SessionSlot::new);
            slot.last_seen = Instant::now();
            Arc::clone(&slot.state)
        };
        SessionLock {
            id,
            guard: state.lock_owned().await,
        }
    }

    /// Store the state an action returned and release the session
    ///
    /// A session left empty is removed unless another request is waiting on it.
    pub fn release(&self, mut lock: SessionLock, state: SessionState) {
        let empty = state == SessionState::default();
        *lock = state;
        let SessionLock { id, guard } = lock;
        drop(guard);

        if empty {
            self.sessions.remove_if(&id, |_, slot| slot.is_unused());
        }
        debug!(session = %id, empty, live_sessions = self.len(), "Session released");
    }

    /// Drop sessions nobody has touched within the idle timeout
    fn evict_idle(&self) {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, slot| slot.last_seen.elapsed() < self.idle_ttl || !slot.is_unused());
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!(evicted, "Evicted idle sessions");
        }
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
