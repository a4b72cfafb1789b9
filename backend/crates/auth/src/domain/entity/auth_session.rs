//! Auth Session Entity
//!
//! Holds the operator's bearer token for the lifetime of the process.
//! The slot is swapped under a single lock, so concurrent login and
//! invalidation resolve to whichever write lands last and readers never
//! observe a half-written token.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use kernel::id::SessionId;

use crate::domain::value_object::bearer_token::BearerToken;

#[derive(Debug, Default)]
struct TokenSlot {
    token: Option<BearerToken>,
    /// Bumped on every write (set or clear)
    generation: u64,
    session_id: Option<SessionId>,
    authenticated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Shared {
    slot: RwLock<TokenSlot>,
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, TokenSlot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TokenSlot> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear(&self, reason: &'static str) -> bool {
        let mut slot = self.write();
        let had_token = slot.token.take().is_some();
        slot.generation += 1;
        let session_id = slot.session_id.take();
        slot.authenticated_at = None;
        drop(slot);

        if had_token {
            match session_id {
                Some(id) => tracing::info!(session_id = %id, reason, "Auth session cleared"),
                None => tracing::info!(reason, "Auth session cleared"),
            }
        }
        had_token
    }
}

/// Auth session entity
///
/// Owned by the top-level session controller. Not `Clone`: other components
/// receive a [`SessionHandle`] instead.
#[derive(Debug, Default)]
pub struct AuthSession {
    shared: Arc<Shared>,
}

impl AuthSession {
    /// Create an empty (unauthenticated) session
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly issued token, replacing any previous one
    ///
    /// Returns the new generation.
    pub fn establish(&self, token: BearerToken) -> u64 {
        let session_id = SessionId::new();
        let mut slot = self.shared.write();
        slot.token = Some(token);
        slot.generation += 1;
        slot.session_id = Some(session_id);
        slot.authenticated_at = Some(Utc::now());
        let generation = slot.generation;
        drop(slot);

        tracing::info!(session_id = %session_id, generation, "Auth session established");
        generation
    }

    /// Clear the token on explicit logout
    pub fn logout(&self) -> bool {
        self.shared.clear("logout")
    }

    /// Clear the token after an authorization failure
    pub fn invalidate(&self) -> bool {
        self.shared.clear("invalidated")
    }

    pub fn current_token(&self) -> Option<BearerToken> {
        self.shared.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.read().token.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.shared.read().generation
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.shared.read().session_id
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.shared.read().authenticated_at
    }

    /// Read-only view for components making authorized calls
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Shared, read-mostly view of an [`AuthSession`]
///
/// Can read the token and invalidate it; cannot set it.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl SessionHandle {
    pub fn current_token(&self) -> Option<BearerToken> {
        self.shared.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.read().token.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.shared.read().generation
    }

    /// Clear the token after an authorization failure
    pub fn invalidate(&self) -> bool {
        self.shared.clear("invalidated")
    }
}
