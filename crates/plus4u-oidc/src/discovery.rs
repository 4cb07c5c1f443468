//! OIDC discovery — resolves an issuer's token endpoint from its
//! well-known configuration document.

use tracing::debug;
use url::Url;

use crate::client::OidcClient;
use crate::error::{OidcError, Result};
use crate::types::OpenIdConfiguration;

/// Path of the discovery document relative to the issuer root.
const WELL_KNOWN_PATH: &str = ".well-known/openid-configuration";

impl OidcClient {
    /// Resolve the token endpoint for an OIDC server.
    ///
    /// Fetches `{oidc_server}/.well-known/openid-configuration` and
    /// extracts `token_endpoint`. A non-empty `uuAppErrorMap` in the
    /// document, a missing endpoint, or an unparseable document all
    /// fail with [`OidcError::Discovery`]. No retries — callers decide
    /// whether to retry the whole login.
    pub async fn resolve_token_endpoint(&self, oidc_server: &str) -> Result<String> {
        let url = discovery_url(oidc_server)?;
        debug!(server = %oidc_server, "resolving OIDC token endpoint");

        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| OidcError::Discovery {
                server: oidc_server.to_string(),
                reason: format!("request failed: {}", e),
            })?;

        let config: OpenIdConfiguration =
            response.json().await.map_err(|e| OidcError::Discovery {
                server: oidc_server.to_string(),
                reason: format!("unparseable configuration document: {}", e),
            })?;

        if !config.uu_app_error_map.is_empty() {
            return Err(OidcError::Discovery {
                server: oidc_server.to_string(),
                reason: error_map_summary(&config.uu_app_error_map),
            });
        }

        match config.token_endpoint {
            Some(endpoint) if !endpoint.is_empty() => {
                debug!(server = %oidc_server, endpoint = %endpoint, "token endpoint resolved");
                Ok(endpoint)
            }
            _ => Err(OidcError::Discovery {
                server: oidc_server.to_string(),
                reason: "configuration document has no token_endpoint".to_string(),
            }),
        }
    }
}

/// Build the discovery document URL, validating the server URL.
fn discovery_url(oidc_server: &str) -> Result<Url> {
    let base = Url::parse(oidc_server).map_err(|e| OidcError::Discovery {
        server: oidc_server.to_string(),
        reason: format!("invalid server URL: {}", e),
    })?;
    // Url::join treats the last path segment as a file unless the base
    // ends with a slash, so normalize before joining.
    let normalized = format!("{}/{}", base.as_str().trim_end_matches('/'), WELL_KNOWN_PATH);
    Url::parse(&normalized).map_err(|e| OidcError::Discovery {
        server: oidc_server.to_string(),
        reason: format!("invalid discovery URL: {}", e),
    })
}

/// Summarize an error map as its keys. Values may carry request
/// parameters, so only the codes are reported.
pub(crate) fn error_map_summary(map: &serde_json::Map<String, serde_json::Value>) -> String {
    map.keys().cloned().collect::<Vec<_>>().join(", ")
}
