//! Request interceptor — resolves lazy placeholders immediately
//! before a request is dispatched.

use tracing::{debug, warn};

use crate::engine::TokenEngine;
use crate::error::{EngineError, Result};
use crate::placeholder::AuthHeaderValue;

/// Header inspected and rewritten by the interceptor.
pub const AUTHORIZATION: &str = "Authorization";

/// Header access on an outbound request, supplied by the host
/// transport.
pub trait RequestHeaders {
    /// Read a header value.
    fn get_header(&self, name: &str) -> Option<String>;
    /// Set (or replace) a header value.
    fn set_header(&mut self, name: &str, value: String);
}

/// Rewrites deferred Authorization headers to real bearer tokens.
#[derive(Debug, Clone)]
pub struct RequestInterceptor {
    engine: TokenEngine,
}

impl RequestInterceptor {
    pub fn new(engine: TokenEngine) -> Self {
        Self { engine }
    }

    /// Run immediately before the request is dispatched.
    ///
    /// An absent or ordinary Authorization header is left untouched,
    /// as is a malformed placeholder (logged, treated as an ordinary
    /// value). A decoded placeholder is resolved through the engine
    /// and the header rewritten to `Bearer {token}`; if no token can
    /// be produced the request must be aborted, so any resolution
    /// failure surfaces as [`EngineError::Unresolved`].
    pub async fn intercept(&self, request: &mut dyn RequestHeaders) -> Result<()> {
        let Some(raw) = request.get_header(AUTHORIZATION) else {
            return Ok(());
        };

        let placeholder = match AuthHeaderValue::parse(&raw) {
            Ok(AuthHeaderValue::Literal(_)) => return Ok(()),
            Ok(AuthHeaderValue::Deferred(placeholder)) => placeholder,
            Err(e) => {
                warn!("Authorization header looks like a placeholder but did not decode: {}", e);
                return Ok(());
            }
        };

        debug!(server = %placeholder.oidc_server, "resolving deferred Authorization header");
        let token = self
            .engine
            .resolve_placeholder(&placeholder)
            .await
            .map_err(|e| match e {
                EngineError::Unresolved(_) => e,
                other => EngineError::Unresolved(other.to_string()),
            })?;

        request.set_header(AUTHORIZATION, format!("Bearer {}", token));
        Ok(())
    }
}
