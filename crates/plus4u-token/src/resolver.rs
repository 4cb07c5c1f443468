//! Credential resolver — ordered fallback chain for access codes.
//!
//! Resolution order: access-code store, then vault, then interactive
//! prompting. Each source is a [`CredentialProvider`]; the chain
//! short-circuits at the first pair found and writes it back into the
//! store so the same identification never resolves twice per session.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use plus4u_oidc::AccessCodePair;

use crate::error::{EngineError, Result};
use crate::prompt::{CredentialPrompt, PromptRequest};
use crate::store::AccessCodeStore;
use crate::vault::VaultGateway;

/// One source of access codes in the fallback chain.
///
/// `Ok(None)` means "not here, try the next source"; errors abort the
/// whole resolution.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &'static str;

    /// Try to produce a pair for an identification.
    async fn try_resolve(
        &self,
        identification: &str,
        interactive: bool,
    ) -> Result<Option<AccessCodePair>>;
}

/// Looks up the in-memory access-code store.
pub struct StoreProvider {
    store: AccessCodeStore,
}

#[async_trait]
impl CredentialProvider for StoreProvider {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn try_resolve(
        &self,
        identification: &str,
        _interactive: bool,
    ) -> Result<Option<AccessCodePair>> {
        Ok(self.store.get(identification).await)
    }
}

/// Looks up the vault through its gateway.
///
/// Vault failures (wrong password, cancelled password prompt) are
/// absorbed by the gateway and surface here as absent.
pub struct VaultProvider {
    vault: VaultGateway,
    prompt: Arc<dyn CredentialPrompt>,
}

#[async_trait]
impl CredentialProvider for VaultProvider {
    fn name(&self) -> &'static str {
        "vault"
    }

    async fn try_resolve(
        &self,
        identification: &str,
        interactive: bool,
    ) -> Result<Option<AccessCodePair>> {
        self.vault
            .lookup(identification, self.prompt.as_ref(), interactive)
            .await
    }
}

/// Prompts the user for both access codes, in order.
///
/// Cancelling either prompt is a hard failure; there is no source
/// left to fall through to. Skipped entirely when the resolution is
/// non-interactive.
pub struct PromptProvider {
    prompt: Arc<dyn CredentialPrompt>,
}

#[async_trait]
impl CredentialProvider for PromptProvider {
    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn try_resolve(
        &self,
        _identification: &str,
        interactive: bool,
    ) -> Result<Option<AccessCodePair>> {
        if !interactive {
            return Ok(None);
        }
        let access_code1 = self
            .prompt
            .prompt(PromptRequest::secret("Access Code 1"))
            .await
            .ok_or(EngineError::PromptCancelled)?;
        let access_code2 = self
            .prompt
            .prompt(PromptRequest::secret("Access Code 2"))
            .await
            .ok_or(EngineError::PromptCancelled)?;
        Ok(Some(AccessCodePair::new(access_code1, access_code2)))
    }
}

/// Walks the provider chain and writes successes back into the store.
pub struct CredentialResolver {
    store: AccessCodeStore,
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialResolver {
    /// Build the standard store → vault → prompt chain.
    pub fn new(
        store: AccessCodeStore,
        vault: VaultGateway,
        prompt: Arc<dyn CredentialPrompt>,
    ) -> Self {
        let providers: Vec<Box<dyn CredentialProvider>> = vec![
            Box::new(StoreProvider {
                store: store.clone(),
            }),
            Box::new(VaultProvider {
                vault,
                prompt: Arc::clone(&prompt),
            }),
            Box::new(PromptProvider { prompt }),
        ];
        Self { store, providers }
    }

    /// Resolve an access-code pair for an identification.
    ///
    /// Whichever source produces the pair, it is written back into the
    /// access-code store for reuse under the same identification.
    pub async fn resolve(&self, identification: &str, interactive: bool) -> Result<AccessCodePair> {
        for provider in &self.providers {
            if let Some(pair) = provider.try_resolve(identification, interactive).await? {
                debug!(
                    identification = %identification,
                    source = provider.name(),
                    "access codes resolved"
                );
                self.store.set(identification, pair.clone()).await;
                return Ok(pair);
            }
        }
        Err(EngineError::Unresolved(format!(
            "no access codes available for identification '{}'",
            identification
        )))
    }
}
