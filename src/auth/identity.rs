//! Identity provider adapter.
//!
//! Turns an inbound request's session token into a verified identity claim.

use axum::http::HeaderMap;
use tracing::debug;

use super::cookie::get_session_token;
use crate::jwt::{JwtConfig, SessionClaims};

/// Verified identity for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    /// Provider account identifier
    pub provider_account_id: Option<String>,
    /// Email address
    pub email: Option<String>,
}

impl From<SessionClaims> for IdentityClaim {
    fn from(claims: SessionClaims) -> Self {
        Self {
            provider_account_id: claims.account_id,
            email: claims.email,
        }
    }
}

/// Source of verified identity claims.
///
/// Returns `None` for absent, malformed, expired, or otherwise invalid tokens;
/// callers never distinguish between these cases.
pub trait IdentityProvider: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Option<IdentityClaim>;
}

/// Verifies HS256 session tokens signed with the secret shared with the auth provider.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    jwt: JwtConfig,
}

impl JwtIdentityProvider {
    pub fn new(jwt: JwtConfig) -> Self {
        Self { jwt }
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn verify(&self, headers: &HeaderMap) -> Option<IdentityClaim> {
        let token = get_session_token(headers)?;
        match self.jwt.validate_session_token(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}
