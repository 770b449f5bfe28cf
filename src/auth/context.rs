//! Per-request authentication context.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::identity::IdentityClaim;
use super::state::HasAuthBackend;

/// The verified identity (if any) of the current request.
///
/// The route guard stores this in request extensions after verifying a token;
/// on unguarded routes the extractor verifies the token itself.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    claim: Option<IdentityClaim>,
}

impl AuthContext {
    pub fn authenticated(claim: IdentityClaim) -> Self {
        Self { claim: Some(claim) }
    }

    pub fn anonymous() -> Self {
        Self { claim: None }
    }

    pub fn claim(&self) -> Option<&IdentityClaim> {
        self.claim.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.claim.is_some()
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(ctx.clone());
        }
        Ok(AuthContext {
            claim: state.identity().verify(&parts.headers),
        })
    }
}
