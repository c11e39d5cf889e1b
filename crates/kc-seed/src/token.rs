//! Shared access token.
//!
//! Workers read the current token without blocking each other. When a
//! request is rejected, the worker asks the cell to refresh the token it
//! used; refreshes for the same stale token are coalesced so that a burst
//! of 401s around one expiry costs a single token request.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::client::AdminApi;
use crate::SeedResult;

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// A token together with the generation it was issued in.
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    /// The token.
    pub token: Arc<AccessToken>,
    /// Incremented on every replacement.
    pub generation: u64,
}

/// Replaceable token shared by all workers.
#[derive(Debug)]
pub struct TokenCell {
    current: RwLock<TokenSnapshot>,
    refresh_lock: tokio::sync::Mutex<()>,
    refreshes: AtomicU64,
}

impl TokenCell {
    /// Creates a cell holding the initial token.
    #[must_use]
    pub fn new(token: AccessToken) -> Self {
        Self {
            current: RwLock::new(TokenSnapshot {
                token: Arc::new(token),
                generation: 0,
            }),
            refresh_lock: tokio::sync::Mutex::new(()),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Returns the token currently in use.
    #[must_use]
    pub fn current(&self) -> TokenSnapshot {
        self.current.read().clone()
    }

    /// Replaces `stale` with a freshly issued token.
    ///
    /// If another worker already replaced `stale`, its token is returned
    /// without contacting the server.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Auth` if re-authentication fails.
    pub async fn refresh<A>(&self, api: &A, stale: &TokenSnapshot) -> SeedResult<TokenSnapshot>
    where
        A: AdminApi + ?Sized,
    {
        let _guard = self.refresh_lock.lock().await;

        let current = self.current();
        if current.generation != stale.generation {
            debug!(
                generation = current.generation,
                "Token already refreshed by another worker"
            );
            return Ok(current);
        }

        warn!(
            generation = stale.generation,
            "Access token rejected, re-authenticating"
        );
        let token = api.authenticate().await?;
        let next = TokenSnapshot {
            token: Arc::new(token),
            generation: stale.generation + 1,
        };
        *self.current.write() = next.clone();
        self.refreshes.fetch_add(1, Ordering::Relaxed);

        Ok(next)
    }

    /// Number of times the token has been replaced.
    #[must_use]
    pub fn refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }
}
