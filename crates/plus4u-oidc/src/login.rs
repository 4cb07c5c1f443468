//! Password-grant login — exchanges an access-code pair for an
//! identity token via the discovered token endpoint.

use tracing::{debug, info};

use crate::client::OidcClient;
use crate::discovery::error_map_summary;
use crate::error::{OidcError, Result};
use crate::types::{AccessCodePair, GrantTokenRequest, GrantTokenResponse};

impl OidcClient {
    /// Exchange an access-code pair for an identity token.
    ///
    /// Empty access codes fail fast with [`OidcError::InvalidCredentials`]
    /// before any network call — in an unprompted flow emptiness is an
    /// expected transient state, and a discovery round trip for it would
    /// be wasted. A non-empty `uuAppErrorMap` in the token response
    /// fails with [`OidcError::Login`]; retrying the same credentials
    /// cannot succeed, so there is no retry or backoff.
    ///
    /// The returned token is opaque — no signature or expiry validation
    /// is performed locally.
    pub async fn login(&self, codes: &AccessCodePair, oidc_server: &str) -> Result<String> {
        if !codes.is_complete() {
            return Err(OidcError::InvalidCredentials);
        }

        let token_endpoint = self.resolve_token_endpoint(oidc_server).await?;

        let request = GrantTokenRequest {
            access_code1: &codes.access_code1,
            access_code2: &codes.access_code2,
            grant_type: "password",
        };

        debug!(server = %oidc_server, "requesting identity token");
        let response: GrantTokenResponse = self
            .http
            .post(&token_endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| OidcError::Login {
                server: oidc_server.to_string(),
                reason: format!("unparseable token response: {}", e),
            })?;

        if !response.uu_app_error_map.is_empty() {
            return Err(OidcError::Login {
                server: oidc_server.to_string(),
                reason: error_map_summary(&response.uu_app_error_map),
            });
        }

        match response.id_token {
            Some(token) if !token.is_empty() => {
                info!(server = %oidc_server, "identity token obtained");
                Ok(token)
            }
            _ => Err(OidcError::Login {
                server: oidc_server.to_string(),
                reason: "token response has no id_token".to_string(),
            }),
        }
    }
}
