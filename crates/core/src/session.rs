//! Browsing sessions.
//!
//! Each session owns one [`SessionGlossary`]. A session is created explicitly, looked up by its
//! UUID while it is in use, and discarded together with its glossary when it ends. Nothing is
//! persisted.
//!
//! Sessions that are not looked up for longer than the registry's idle timeout expire: lookups
//! treat them as unknown, and they are dropped the next time a session starts or
//! [`SessionRegistry::prune_idle`] runs.

use crate::constants::DEFAULT_SESSION_IDLE_TIMEOUT;
use crate::error::{CoreError, CoreResult};
use crate::glossary::SessionGlossary;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug)]
struct Session {
    glossary: Arc<SessionGlossary>,
    last_used: Mutex<Instant>,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self {
            glossary: Arc::new(SessionGlossary::new()),
            last_used: Mutex::new(now),
        }
    }

    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        let last_used = *self.last_used.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last_used) >= timeout
    }

    fn touch(&self, now: Instant) {
        *self.last_used.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Session>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Starts a session with an empty glossary and returns its identifier.
    ///
    /// Idle sessions are dropped first.
    pub fn start(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        Self::remove_idle(&mut sessions, now, self.idle_timeout);
        sessions.insert(id, Session::new(now));
        tracing::debug!("session started: {}", id);
        id
    }

    /// The glossary of a live session. A successful lookup counts as use.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::SessionNotFound` if the session was never started, has ended, or has
    /// been idle for longer than the idle timeout.
    pub fn glossary(&self, id: Uuid) -> CoreResult<Arc<SessionGlossary>> {
        let now = Instant::now();
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(&id) {
            Some(session) if !session.is_idle(now, self.idle_timeout) => {
                session.touch(now);
                Ok(Arc::clone(&session.glossary))
            }
            _ => Err(CoreError::SessionNotFound(id)),
        }
    }

    /// Ends a session, discarding its glossary.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::SessionNotFound` if the session was never started or has already
    /// ended.
    pub fn end(&self, id: Uuid) -> CoreResult<()> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| tracing::debug!("session ended: {}", id))
            .ok_or(CoreError::SessionNotFound(id))
    }

    /// Drops every idle session. Returns how many were dropped.
    pub fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        Self::remove_idle(&mut sessions, Instant::now(), self.idle_timeout)
    }

    fn remove_idle(sessions: &mut HashMap<Uuid, Session>, now: Instant, timeout: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!("dropped {} idle sessions", removed);
        }
        removed
    }

    /// Number of stored sessions, including idle ones not yet dropped.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
