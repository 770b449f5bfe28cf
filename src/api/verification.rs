//! Verification status for the signed-in subject.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{ApiAuthError, AuthContext, IdentityProvider, RoleResolver, SubjectStatus};
use crate::db::{Database, Role, VerificationType};
use crate::impl_has_auth_backend;

#[derive(Clone)]
pub struct VerificationState {
    pub db: Database,
    pub identity: Arc<dyn IdentityProvider>,
}

impl_has_auth_backend!(VerificationState);

/// Wire shape of the verification status. Exposes nothing else from the user record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatusResponse {
    is_verified: bool,
    verified_at: Option<String>,
    verification_type: Option<VerificationType>,
    user_role: Role,
}

impl From<SubjectStatus> for VerificationStatusResponse {
    fn from(status: SubjectStatus) -> Self {
        Self {
            is_verified: status.is_verified,
            verified_at: status.verified_at,
            verification_type: status.verification_type,
            user_role: status.role,
        }
    }
}

pub fn router(state: VerificationState) -> Router {
    Router::new()
        .route("/verification-status", get(verification_status))
        .with_state(state)
}

async fn verification_status(
    State(state): State<VerificationState>,
    ctx: AuthContext,
) -> Result<Json<VerificationStatusResponse>, ApiAuthError> {
    let status = RoleResolver::new(state.db.clone())
        .resolve(ctx.claim())
        .await?;
    Ok(Json(status.into()))
}
