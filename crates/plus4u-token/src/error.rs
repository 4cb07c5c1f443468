//! Error types for the token engine.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while resolving a token.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Discovery or login against the OIDC server failed.
    #[error(transparent)]
    Oidc(#[from] plus4u_oidc::OidcError),

    /// The vault could not be read (wrong password, unreadable store).
    ///
    /// Raised by vault capability implementations; the credential
    /// resolver absorbs it and falls through to interactive prompting.
    #[error("vault error: {0}")]
    Vault(String),

    /// The user dismissed an access-code prompt without input.
    #[error("credential prompt cancelled")]
    PromptCancelled,

    /// No token could be produced for a request that required one.
    ///
    /// Terminal: the triggering request must be aborted rather than
    /// sent with a stale or missing Authorization header.
    #[error("unresolved token: {0}")]
    Unresolved(String),
}
