//! Error types for OIDC discovery and login.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OidcError>;

/// Errors that can occur while talking to an OIDC server.
///
/// Error messages identify the failing server and the probable cause
/// (bad URL vs. rejected credentials) but never contain access codes.
#[derive(Debug, Error)]
pub enum OidcError {
    /// The issuer's well-known configuration could not be fetched or parsed.
    #[error("OIDC discovery failed for {server}: {reason}")]
    Discovery {
        /// The OIDC server the discovery document was requested from.
        server: String,
        /// What went wrong (bad URL, unparseable document, error map).
        reason: String,
    },

    /// The token endpoint rejected the grant request.
    #[error("login rejected by {server} (likely an invalid access code combination): {reason}")]
    Login {
        /// The OIDC server that rejected the login.
        server: String,
        /// Error codes reported by the server.
        reason: String,
    },

    /// An access code was empty. Raised before any network call.
    #[error("both access codes must be non-empty")]
    InvalidCredentials,

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
