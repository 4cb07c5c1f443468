//! In-memory access-code store.
//!
//! Remembers the access-code pair last used for each identification so
//! one session never prompts twice for the same identification. No
//! TTL — entries live until process restart, independent of whether
//! the token issued from them is still cached.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use plus4u_oidc::AccessCodePair;

/// Session-lifetime map from identification to access-code pair.
///
/// Cheaply clonable; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct AccessCodeStore {
    entries: Arc<RwLock<HashMap<String, AccessCodePair>>>,
}

impl AccessCodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the pair last stored for an identification.
    pub async fn get(&self, identification: &str) -> Option<AccessCodePair> {
        self.entries.read().await.get(identification).cloned()
    }

    /// Remember a pair for an identification.
    pub async fn set(&self, identification: &str, pair: AccessCodePair) {
        debug!(identification = %identification, "access codes stored for session");
        self.entries
            .write()
            .await
            .insert(identification.to_string(), pair);
    }

    /// Number of stored identifications.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
