//! In-memory login sessions.
//!
//! Sessions expire after the configured time to live and do not survive a
//! restart.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::auth::AdminIdentity;

#[derive(Debug)]
struct Session {
    identity: AdminIdentity,
    created_at: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn is_live(&self, session: &Session, now: Instant) -> bool {
        now.duration_since(session.created_at) < self.ttl
    }

    /// ## Summary
    /// Opens a session for `identity` and returns its opaque token.
    ///
    /// ## Side Effects
    /// Stores the session and evicts every expired one.
    pub async fn create(&self, identity: AdminIdentity) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| self.is_live(session, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Evicted expired sessions");
        }
        sessions.insert(
            token.clone(),
            Session {
                identity,
                created_at: now,
            },
        );

        token
    }

    /// ## Summary
    /// Looks up the identity behind a session token.
    ///
    /// An expired session is removed and reported as unknown.
    pub async fn get(&self, token: &str) -> Option<AdminIdentity> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            let session = sessions.get(token)?;
            if self.is_live(session, now) {
                return Some(session.identity.clone());
            }
        }

        self.sessions.write().await.remove(token);
        tracing::debug!("Session expired");
        None
    }

    /// Removes a session, returning whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of stored sessions, expired ones included until evicted.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
