//! Vault gateway — password-gated access to a persisted store of
//! access-code pairs keyed by identification.
//!
//! The encrypted on-disk format belongs to the [`AccessCodeVault`]
//! implementation; this module owns only the unlock state machine:
//! at most one successful unlock per process, with the password
//! retained in memory afterwards so repeated reads never re-prompt.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use plus4u_oidc::AccessCodePair;

use crate::error::Result;
use crate::prompt::{CredentialPrompt, PromptRequest};

/// Vault capability supplied by the host environment.
#[async_trait]
pub trait AccessCodeVault: Send + Sync {
    /// Whether a vault has been persisted at all.
    async fn exists(&self) -> bool;

    /// Decrypt and return the full vault contents.
    ///
    /// Fails with [`crate::EngineError::Vault`] on a wrong password.
    async fn read(&self, password: &str) -> Result<HashMap<String, AccessCodePair>>;
}

/// Gateway in front of an optional vault backend.
///
/// Cheaply clonable; clones share the unlocked-password state.
#[derive(Clone)]
pub struct VaultGateway {
    backend: Option<Arc<dyn AccessCodeVault>>,
    /// Password of the last successful unlock, kept for the process
    /// lifetime. A failed unlock never lands here.
    unlocked_password: Arc<RwLock<Option<String>>>,
}

impl VaultGateway {
    /// Gateway over a vault backend.
    pub fn new(backend: Arc<dyn AccessCodeVault>) -> Self {
        Self {
            backend: Some(backend),
            unlocked_password: Arc::new(RwLock::new(None)),
        }
    }

    /// Gateway with no vault configured; every lookup is absent.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            unlocked_password: Arc::new(RwLock::new(None)),
        }
    }

    /// Whether the vault has been unlocked in this process.
    pub async fn is_unlocked(&self) -> bool {
        self.unlocked_password.read().await.is_some()
    }

    /// Look up an identification in the vault.
    ///
    /// Absent backend, missing vault, a cancelled password prompt, and
    /// a wrong password all yield `Ok(None)` — the caller falls
    /// through to the next credential source rather than failing. When
    /// `interactive` is false and the vault is still locked, no prompt
    /// is shown and the lookup is absent.
    pub async fn lookup(
        &self,
        identification: &str,
        prompt: &dyn CredentialPrompt,
        interactive: bool,
    ) -> Result<Option<AccessCodePair>> {
        let Some(backend) = &self.backend else {
            return Ok(None);
        };
        if !backend.exists().await {
            return Ok(None);
        }

        let password = match self.unlocked_password.read().await.clone() {
            Some(password) => password,
            None => {
                if !interactive {
                    debug!("vault locked and prompting unavailable, skipping");
                    return Ok(None);
                }
                match prompt.prompt(PromptRequest::secret("Vault password")).await {
                    Some(password) => password,
                    None => {
                        debug!("vault password prompt cancelled, skipping vault");
                        return Ok(None);
                    }
                }
            }
        };

        match backend.read(&password).await {
            Ok(contents) => {
                // Retain the password only after it has decrypted the vault.
                *self.unlocked_password.write().await = Some(password);
                debug!(identification = %identification, "vault unlocked");
                Ok(contents.get(identification).cloned())
            }
            Err(e) => {
                warn!("vault read failed, falling through: {}", e);
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for VaultGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultGateway")
            .field("configured", &self.backend.is_some())
            .finish_non_exhaustive()
    }
}
