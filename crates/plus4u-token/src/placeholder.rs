//! Lazy placeholder protocol.
//!
//! A token reference can be embedded in a header value at
//! request-build time as `plus4uToken<JSON>` and resolved to a real
//! token only at request-send time. [`AuthHeaderValue`] is the typed
//! boundary between ordinary header values and deferred tokens; all
//! encoding and decoding lives here, never as ad hoc string matching
//! at call sites.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literal tag opening a placeholder.
const TAG_OPEN: &str = "plus4uToken<";

/// Optional scheme prefix tolerated in front of the tag.
const BEARER_PREFIX: &str = "Bearer ";

/// The placeholder tag matched but its payload did not.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The angle brackets were unbalanced or trailing content followed.
    #[error("malformed placeholder: {0}")]
    Grammar(&'static str),

    /// The JSON payload was invalid or missing required fields.
    #[error("malformed placeholder payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Deferred-resolution request embedded in a header value.
///
/// All five fields are required on the wire; a payload missing any of
/// them is a [`DecodeError`], never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPlaceholder {
    pub access_code1: String,
    pub access_code2: String,
    /// Whether interactive prompting is allowed during resolution.
    pub prompt: bool,
    /// Identification scoping the credential session; may be empty.
    pub identification: String,
    pub oidc_server: String,
}

impl TokenPlaceholder {
    /// Encode as a `plus4uToken<JSON>` placeholder string.
    pub fn encode(&self) -> String {
        // Serialization of a struct with only string/bool fields
        // cannot fail.
        let json = serde_json::to_string(self).expect("placeholder serialization");
        format!("{}{}>", TAG_OPEN, json)
    }
}

/// A parsed Authorization header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthHeaderValue {
    /// An ordinary value, passed through untouched.
    Literal(String),
    /// A placeholder to be resolved before the request is sent.
    Deferred(TokenPlaceholder),
}

impl AuthHeaderValue {
    /// Parse a header value against the exact placeholder grammar:
    /// an optional `"Bearer "` prefix, the literal `plus4uToken<`,
    /// a JSON payload, and a closing `>` at the very end of the
    /// string. No partial matches and no trailing content.
    ///
    /// A value without the tag is [`AuthHeaderValue::Literal`]; a value
    /// with the tag but a bad payload is a [`DecodeError`].
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        let tagged = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw);
        let Some(payload_and_close) = tagged.strip_prefix(TAG_OPEN) else {
            return Ok(Self::Literal(raw.to_string()));
        };
        let payload = payload_and_close
            .strip_suffix('>')
            .ok_or(DecodeError::Grammar("missing closing '>'"))?;
        let placeholder: TokenPlaceholder = serde_json::from_str(payload)?;
        Ok(Self::Deferred(placeholder))
    }
}
