//! In-process session store
//!
//! Maps opaque tokens (carried by the session cookie) to non-sensitive
//! user snapshots. Sessions are created on login, destroyed on logout,
//! and expire lazily once their TTL elapses. The map is the only shared
//! mutable state in the auth flow; inserts and removals are atomic under
//! the RwLock.

use crate::auth::models::UserSnapshot;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Number of random bytes behind each session token (256 bits)
const TOKEN_BYTES: usize = 32;

/// A live session: opaque token plus the identity snapshot it vouches for
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserSnapshot,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Process-wide session store keyed by token
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a new SessionManager with the given time-to-live
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(1)),
        }
    }

    /// Create a session for the given user snapshot and return it
    pub async fn create(&self, user: UserSnapshot) -> Session {
        let now = Utc::now();
        let session = Session {
            token: generate_token(),
            user,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Resolve a token to its user snapshot
    ///
    /// Expired sessions are removed on access and resolve to None, so an
    /// expired token behaves exactly like an unknown one.
    pub async fn resolve(&self, token: &str) -> Option<UserSnapshot> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if session.is_expired() => {
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.user.clone()),
            None => None,
        }
    }

    /// Destroy a session; returns whether it existed
    ///
    /// Destroying an unknown or already-destroyed token is a no-op, which
    /// is what makes logout idempotent.
    pub async fn destroy(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token).is_some()
    }

    /// Drop all expired sessions; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    /// Number of sessions currently held (live and not-yet-purged expired)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Generate an opaque session token from OS randomness
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
