//! Shared bearer credential cell
//!
//! The token is written by the auth service (login, forced logout) and read
//! by the HTTP adapter on every request. Both sides hold the same cell, so
//! clearing it on a 401 immediately de-authenticates every in-flight
//! component without further coordination.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Cloneable handle to the current bearer token, if any.
#[derive(Clone, Default)]
pub struct BearerToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl BearerToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly issued token.
    pub async fn set(&self, token: impl Into<String>) {
        *self.inner.write().await = Some(token.into());
    }

    /// Drop the token (logout or credential expiry).
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Current token, cloned out of the cell.
    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn is_set(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
