//! Token-lifecycle engine for uuApp OIDC identity tokens.
//!
//! Acquires, caches, and lazily resolves identity tokens for outbound
//! HTTP requests, backed by an optional encrypted credential vault:
//!
//! - [`TokenEngine`] — the stateful core: TTL token cache,
//!   session access-code store, vault unlock state, and the
//!   store → vault → prompt credential chain.
//! - [`TokenPlaceholder`] / [`AuthHeaderValue`] — the lazy protocol:
//!   a token reference encoded as `plus4uToken<JSON>` in a header
//!   value at request-build time.
//! - [`RequestInterceptor`] — decodes placeholders immediately before
//!   a request is sent and rewrites the Authorization header.
//!
//! The host environment plugs in through three capability traits:
//! [`CredentialPrompt`] (interactive prompting), [`AccessCodeVault`]
//! (the encrypted store), and [`RequestHeaders`] (the transport's
//! outbound request object).
//!
//! Token cache and access-code store live in memory only; nothing
//! persists across process restarts.

mod cache;
mod engine;
mod error;
mod interceptor;
mod placeholder;
mod prompt;
mod resolver;
mod store;
mod vault;

pub use cache::{CacheKey, TokenCache, DEFAULT_SWEEP_INTERVAL, DEFAULT_TOKEN_TTL};
pub use engine::{EngineConfig, TokenEngine, TokenEngineBuilder};
pub use error::{EngineError, Result};
pub use interceptor::{RequestHeaders, RequestInterceptor, AUTHORIZATION};
pub use placeholder::{AuthHeaderValue, DecodeError, TokenPlaceholder};
pub use prompt::{CredentialPrompt, NoInteraction, PromptRequest};
pub use resolver::{CredentialProvider, CredentialResolver};
pub use store::AccessCodeStore;
pub use vault::{AccessCodeVault, VaultGateway};

pub use plus4u_oidc::{AccessCodePair, OidcClient, OidcError};
