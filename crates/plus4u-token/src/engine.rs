//! The token engine — owns all process-wide token state.
//!
//! One [`TokenEngine`] per process ties together the OIDC client, the
//! TTL token cache, the access-code store, and the vault gateway. It
//! is cheaply clonable: clones share the same state, so it can be
//! handed to every component that needs tokens instead of living as
//! ambient global state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use plus4u_oidc::{AccessCodePair, OidcClient};

use crate::cache::{CacheKey, TokenCache, DEFAULT_SWEEP_INTERVAL, DEFAULT_TOKEN_TTL};
use crate::error::Result;
use crate::placeholder::TokenPlaceholder;
use crate::prompt::{CredentialPrompt, NoInteraction};
use crate::resolver::CredentialResolver;
use crate::store::AccessCodeStore;
use crate::vault::{AccessCodeVault, VaultGateway};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Lifetime of a cached token.
    pub token_ttl: Duration,
    /// Interval between background sweeps of expired tokens.
    pub sweep_interval: Duration,
    /// Whether to spawn the sweep task (disable in tests).
    pub enable_sweeper: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TOKEN_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            enable_sweeper: true,
        }
    }
}

impl EngineConfig {
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_sweeper(mut self, enabled: bool) -> Self {
        self.enable_sweeper = enabled;
        self
    }
}

/// Aborts the sweep task when the last engine clone is dropped.
#[derive(Debug)]
struct SweeperGuard(JoinHandle<()>);

impl Drop for SweeperGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Token-lifecycle engine.
///
/// # Example
///
/// ```no_run
/// use plus4u_token::TokenEngine;
///
/// # async fn example() -> plus4u_token::Result<()> {
/// let engine = TokenEngine::builder().build();
/// let token = engine
///     .token_for_identity("jdoe", "https://oidc.plus4u.net/uu-oidcg01-main/0-0", true)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenEngine {
    oidc: OidcClient,
    cache: TokenCache,
    store: AccessCodeStore,
    resolver: Arc<CredentialResolver>,
    _sweeper: Option<Arc<SweeperGuard>>,
}

impl TokenEngine {
    /// Start building an engine.
    pub fn builder() -> TokenEngineBuilder {
        TokenEngineBuilder::default()
    }

    /// The token cache.
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// The session access-code store.
    pub fn store(&self) -> &AccessCodeStore {
        &self.store
    }

    /// Get a token for a raw access-code pair (raw-credential mode).
    ///
    /// Cached per `(server, codes)`; a different pair is a different
    /// cache entry.
    pub async fn token_for_codes(
        &self,
        codes: &AccessCodePair,
        oidc_server: &str,
    ) -> Result<String> {
        let key = CacheKey::raw(oidc_server, codes);
        if let Some(token) = self.cache.get(&key).await {
            debug!(kind = key.kind(), "token served from cache");
            return Ok(token);
        }
        let token = self.oidc.login(codes, oidc_server).await?;
        self.cache.set(key, token.clone()).await;
        Ok(token)
    }

    /// Get a token for an identification (identity-scoped mode).
    ///
    /// Cached per `(server, identification)`, so access codes may
    /// change without invalidating the token. Until the cached token
    /// expires, the credential chain (store, vault, prompt) is never
    /// re-invoked.
    pub async fn token_for_identity(
        &self,
        identification: &str,
        oidc_server: &str,
        interactive: bool,
    ) -> Result<String> {
        self.identity_token(identification, oidc_server, interactive, None)
            .await
    }

    /// Resolve a decoded placeholder to a token.
    ///
    /// Identity mode when the placeholder allows prompting or carries
    /// an identification; raw-credential mode otherwise. In identity
    /// mode, complete inline codes take precedence over the credential
    /// chain and are remembered for the session.
    pub async fn resolve_placeholder(&self, placeholder: &TokenPlaceholder) -> Result<String> {
        let inline = AccessCodePair::new(
            placeholder.access_code1.clone(),
            placeholder.access_code2.clone(),
        );
        if placeholder.prompt || !placeholder.identification.is_empty() {
            let inline = inline.is_complete().then_some(inline);
            self.identity_token(
                &placeholder.identification,
                &placeholder.oidc_server,
                placeholder.prompt,
                inline,
            )
            .await
        } else {
            self.token_for_codes(&inline, &placeholder.oidc_server).await
        }
    }

    async fn identity_token(
        &self,
        identification: &str,
        oidc_server: &str,
        interactive: bool,
        inline: Option<AccessCodePair>,
    ) -> Result<String> {
        let key = CacheKey::identity(oidc_server, identification);
        if let Some(token) = self.cache.get(&key).await {
            debug!(kind = key.kind(), identification = %identification, "token served from cache");
            return Ok(token);
        }

        let pair = match inline {
            Some(pair) => {
                self.store.set(identification, pair.clone()).await;
                pair
            }
            None => self.resolver.resolve(identification, interactive).await?,
        };

        let token = self.oidc.login(&pair, oidc_server).await?;
        self.cache.set(key, token.clone()).await;
        Ok(token)
    }
}

impl std::fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEngine")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TokenEngine`].
///
/// Defaults: no vault, [`NoInteraction`] prompt, default config.
pub struct TokenEngineBuilder {
    oidc: OidcClient,
    prompt: Arc<dyn CredentialPrompt>,
    vault: Option<Arc<dyn AccessCodeVault>>,
    config: EngineConfig,
}

impl Default for TokenEngineBuilder {
    fn default() -> Self {
        Self {
            oidc: OidcClient::new(),
            prompt: Arc::new(NoInteraction),
            vault: None,
            config: EngineConfig::default(),
        }
    }
}

impl TokenEngineBuilder {
    /// Use a custom OIDC client (e.g. with a different timeout).
    pub fn oidc(mut self, client: OidcClient) -> Self {
        self.oidc = client;
        self
    }

    /// Supply the host's interactive prompt.
    pub fn prompt(mut self, prompt: Arc<dyn CredentialPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Supply the host's vault backend.
    pub fn vault(mut self, vault: Arc<dyn AccessCodeVault>) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Override the engine config.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine, spawning the sweep task unless disabled.
    ///
    /// Must be called within a tokio runtime when the sweeper is
    /// enabled.
    pub fn build(self) -> TokenEngine {
        let cache = TokenCache::new(self.config.token_ttl);
        let store = AccessCodeStore::new();
        let gateway = match self.vault {
            Some(backend) => VaultGateway::new(backend),
            None => VaultGateway::disabled(),
        };
        let resolver = CredentialResolver::new(store.clone(), gateway, self.prompt);

        let sweeper = self
            .config
            .enable_sweeper
            .then(|| Arc::new(SweeperGuard(cache.spawn_sweeper(self.config.sweep_interval))));

        TokenEngine {
            oidc: self.oidc,
            cache,
            store,
            resolver: Arc::new(resolver),
            _sweeper: sweeper,
        }
    }
}
