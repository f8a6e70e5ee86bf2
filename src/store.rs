//! Concurrent registry of live sessions, keyed by lobby code.

use crate::models::TournamentSession;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A session behind its per-session lock. Every compound read-modify-write on
/// one session (round advance, move routing plus reconciliation, leave) takes
/// this lock and holds it across any persistence awaits, so no conflicting
/// operation can interleave with a half-applied round. Operations on
/// *different* sessions run fully in parallel.
pub type SharedSession = Arc<Mutex<TournamentSession>>;

/// Sole source of truth for live sessions. Safe for concurrent
/// get/insert/remove without external locking.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<SharedSession> {
        self.sessions.get(code).map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, session: TournamentSession) -> SharedSession {
        let code = session.code.clone();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(code, Arc::clone(&shared));
        shared
    }

    /// Remove the session for `code`. Returns whether it was present.
    pub fn remove(&self, code: &str) -> bool {
        self.sessions.remove(code).is_some()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.sessions.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove sessions idle for longer than `max_idle`. A session whose lock
    /// is currently held is in use and is skipped. Returns how many were
    /// removed.
    pub fn purge_inactive(&self, max_idle: Duration) -> usize {
        let codes: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        let mut removed = 0;
        for code in codes {
            let Some(shared) = self.get(&code) else { continue };
            let Ok(session) = shared.try_lock() else { continue };
            if session.last_activity.elapsed() >= max_idle {
                drop(session);
                if self.remove(&code) {
                    removed += 1;
                }
            }
        }
        removed
    }
}
