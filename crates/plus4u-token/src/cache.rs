//! TTL-based token cache.
//!
//! Maps a [`CacheKey`] to a previously issued identity token. Entries
//! expire after a fixed TTL; expiry is checked lazily on every read
//! and a periodic background sweep removes expired entries, so an
//! expired-but-unswept entry is never returned.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use plus4u_oidc::AccessCodePair;

/// Default entry lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Default interval between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Cache key for an issued token.
///
/// The identity-scoped and raw-credential key spaces are kept disjoint
/// by construction (distinct literal prefixes): identity mode
/// intentionally lets access codes change without invalidating the
/// cached token, so a raw key must never alias an identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key scoped to an identification and server.
    pub fn identity(oidc_server: &str, identification: &str) -> Self {
        Self(format!("identity\u{1f}{}\u{1f}{}", oidc_server, identification))
    }

    /// Key scoped to the raw access-code pair and server.
    pub fn raw(oidc_server: &str, codes: &AccessCodePair) -> Self {
        Self(format!(
            "raw\u{1f}{}\u{1f}{}\u{1f}{}",
            oidc_server, codes.access_code1, codes.access_code2
        ))
    }

    /// Which key space this key belongs to, for logging.
    pub fn kind(&self) -> &'static str {
        if self.0.starts_with("identity\u{1f}") {
            "identity"
        } else {
            "raw"
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    token: String,
    cached_at: Instant,
}

/// TTL map from cache key to identity token.
///
/// No maximum size bound: keys are few (one per active user/server
/// combination) and entries self-expire. Cheaply clonable; clones
/// share the same underlying map.
#[derive(Debug, Clone)]
pub struct TokenCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
    ttl: Duration,
}

impl TokenCache {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get a token if present and not expired.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.cached_at.elapsed() > self.ttl {
            // Expired but not yet swept; report absent.
            return None;
        }
        Some(entry.token.clone())
    }

    /// Store a token under a key, resetting its TTL.
    pub async fn set(&self, key: CacheKey, token: String) {
        let mut entries = self.entries.write().await;
        debug!(kind = key.kind(), "token cached");
        entries.insert(
            key,
            CacheEntry {
                token,
                cached_at: Instant::now(),
            },
        );
    }

    /// Remove expired entries, returning how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.cached_at.elapsed() <= self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "swept expired tokens");
        }
        removed
    }

    /// Number of entries, including expired-but-unswept ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Spawn the periodic sweep task.
    ///
    /// The task runs until the handle is dropped or aborted; it holds
    /// its own clone of the cache.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.sweep_expired().await;
            }
        })
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL)
    }
}
