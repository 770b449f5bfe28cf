//! Admin API endpoints.
//!
//! All endpoints require admin role.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ResultExt, validate_uuid};
use crate::auth::{AdminOnly, IdentityProvider, Subject, SubjectStatus};
use crate::db::{Database, Role, User, Verification, VerificationType};
use crate::impl_has_auth_backend;

/// State for admin endpoints.
#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub identity: Arc<dyn IdentityProvider>,
}

impl_has_auth_backend!(AdminState);

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/stats", get(user_stats))
        .route("/users/{uuid}/role", put(set_role))
        .route("/users/{uuid}/verification", put(set_verification))
        .with_state(state)
}

/// List all users.
async fn list_users(
    State(state): State<AdminState>,
    _auth: Subject<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users().list().await.db_err("Failed to list users")?;

    Ok(Json(users))
}

/// User counts per role, for the analytics dashboard.
async fn user_stats(
    State(state): State<AdminState>,
    _auth: Subject<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state
        .db
        .users()
        .stats()
        .await
        .db_err("Failed to count users")?;

    Ok(Json(stats))
}

async fn load_user(state: &AdminState, uuid: &str) -> Result<User, ApiError> {
    validate_uuid(uuid)?;
    state
        .db
        .users()
        .get_by_uuid(uuid)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

#[derive(Deserialize)]
struct SetRoleRequest {
    role: Role,
}

async fn set_role(
    State(state): State<AdminState>,
    auth: Subject<AdminOnly>,
    Path(uuid): Path<String>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &uuid).await?;
    let admin = auth.into_inner().user;

    // Admins cannot demote themselves
    if user.id == admin.id && payload.role != Role::Admin {
        return Err(ApiError::bad_request("Cannot remove your own admin role"));
    }

    state
        .db
        .users()
        .set_role(user.id, payload.role)
        .await
        .db_err("Failed to set role")?;

    info!(user = %user.uuid, role = payload.role.as_str(), by = %admin.uuid, "Role changed");

    let updated = load_user(&state, &uuid).await?;
    Ok(Json(SubjectStatus::from(&updated)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetVerificationRequest {
    is_verified: bool,
    #[serde(default)]
    verified_at: Option<String>,
    #[serde(default)]
    verification_type: Option<VerificationType>,
}

async fn set_verification(
    State(state): State<AdminState>,
    auth: Subject<AdminOnly>,
    Path(uuid): Path<String>,
    Json(payload): Json<SetVerificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let verification = Verification::from_parts(
        payload.is_verified,
        payload.verified_at,
        payload.verification_type,
    )
    .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = load_user(&state, &uuid).await?;

    state
        .db
        .users()
        .set_verification(user.id, &verification)
        .await
        .db_err("Failed to set verification")?;

    info!(
        user = %user.uuid,
        verified = payload.is_verified,
        by = %auth.into_inner().user.uuid,
        "Verification changed"
    );

    let updated = load_user(&state, &uuid).await?;
    Ok(Json(SubjectStatus::from(&updated)))
}
