//! OIDC discovery and password-grant login for uuApp identity servers.
//!
//! Only the slice of OIDC this system needs is modeled: resolving a
//! server's token endpoint from its well-known configuration document
//! and exchanging a long-lived access-code pair for a short-lived
//! identity token. uuApp servers signal application-level errors
//! through a non-empty `uuAppErrorMap` in the response body rather
//! than the HTTP status; that shape is wrapped into [`OidcError`] at
//! this boundary and never leaks to callers.

mod client;
mod discovery;
mod error;
mod login;
mod types;

pub use client::OidcClient;
pub use error::{OidcError, Result};
pub use types::AccessCodePair;
