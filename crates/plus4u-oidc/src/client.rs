//! HTTP client shared by discovery and login.

use std::time::Duration;

/// Default timeout for OIDC requests.
///
/// A hung discovery or login call would otherwise block the triggering
/// request indefinitely.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a uuApp OIDC server: discovery plus password-grant login.
///
/// Holds one shared [`reqwest::Client`]; cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use plus4u_oidc::{AccessCodePair, OidcClient};
///
/// # async fn example() -> plus4u_oidc::Result<()> {
/// let client = OidcClient::new();
/// let codes = AccessCodePair::new("code-1", "code-2");
/// let token = client
///     .login(&codes, "https://oidc.plus4u.net/uu-oidcg01-main/0-0")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OidcClient {
    pub(crate) http: reqwest::Client,
    pub(crate) timeout: Duration,
}

impl OidcClient {
    /// Create a client with the default request timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for OidcClient {
    fn default() -> Self {
        Self::new()
    }
}
