//! Access-code pair and wire documents for the uuApp OIDC endpoints.

use serde::{Deserialize, Serialize};

/// The two-part long-lived secret exchanged for a short-lived token.
///
/// Treated as a secret everywhere: the `Debug` impl redacts both codes
/// so the pair cannot leak through logging or error formatting.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCodePair {
    #[serde(rename = "accessCode1")]
    pub access_code1: String,
    #[serde(rename = "accessCode2")]
    pub access_code2: String,
}

impl AccessCodePair {
    /// Create a pair from the two codes.
    pub fn new(access_code1: impl Into<String>, access_code2: impl Into<String>) -> Self {
        Self {
            access_code1: access_code1.into(),
            access_code2: access_code2.into(),
        }
    }

    /// Whether both codes are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_code1.is_empty() && !self.access_code2.is_empty()
    }
}

impl std::fmt::Debug for AccessCodePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCodePair")
            .field("access_code1", &"***")
            .field("access_code2", &"***")
            .finish()
    }
}

/// Subset of the `.well-known/openid-configuration` document we use.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenIdConfiguration {
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(rename = "uuAppErrorMap", default)]
    pub uu_app_error_map: serde_json::Map<String, serde_json::Value>,
}

/// Password-grant request body for the token endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct GrantTokenRequest<'a> {
    #[serde(rename = "accessCode1")]
    pub access_code1: &'a str,
    #[serde(rename = "accessCode2")]
    pub access_code2: &'a str,
    pub grant_type: &'static str,
}

/// Token endpoint response body.
///
/// uuApp servers signal application errors through a non-empty
/// `uuAppErrorMap` rather than the HTTP status, so both fields are
/// optional at the serde level and checked explicitly.
#[derive(Debug, Deserialize)]
pub(crate) struct GrantTokenResponse {
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(rename = "uuAppErrorMap", default)]
    pub uu_app_error_map: serde_json::Map<String, serde_json::Value>,
}
