//! Session token sources.
//!
//! The client asks its `SessionProvider` for a token on every call and never
//! caches the answer, so a token rotated or cleared between two calls is
//! picked up by the second one.

use std::sync::{Arc, PoisonError, RwLock};

/// Supplies the current user's session token, or `None` when signed out.
pub trait SessionProvider: Send + Sync {
    fn session_token(&self) -> Option<String>;
}

impl<F> SessionProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn session_token(&self) -> Option<String> {
        self()
    }
}

/// Shared, mutable token holder for apps that manage sign-in themselves.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionProvider for SessionStore {
    fn session_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
