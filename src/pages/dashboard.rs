use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::warn;

use super::PagesState;
use crate::auth::{
    AdminOnly, ApiAuthError, AuthContext, CandidateOnly, CompanyOnly, ResolveError, RoleResolver,
    Subject, SubjectStatus,
};
use crate::dashboard::{DashboardRouter, SessionState};

/// Send the subject to the dashboard surface for their role.
///
/// A verified session without a user record is treated as having no role and
/// lands on the candidate surface. Without a session nothing is rendered.
pub async fn dashboard_entry(
    State(state): State<PagesState>,
    ctx: AuthContext,
) -> Result<Response, ApiAuthError> {
    let resolver = RoleResolver::new(state.db.clone());
    let session = match resolver.resolve(ctx.claim()).await {
        Ok(status) => SessionState::Authenticated(Some(status.role)),
        Err(ResolveError::NotFound) => {
            warn!("Verified session has no user record");
            SessionState::Authenticated(None)
        }
        Err(ResolveError::Unauthorized) => SessionState::Unauthenticated,
        Err(e @ ResolveError::Internal) => return Err(e.into()),
    };

    let mut router = DashboardRouter::new();
    Ok(match router.observe(session) {
        Some(target) => Redirect::temporary(target).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[derive(Serialize)]
pub struct DashboardSurface {
    surface: &'static str,
    status: SubjectStatus,
}

pub async fn admin_dashboard(auth: Subject<AdminOnly>) -> Json<DashboardSurface> {
    Json(DashboardSurface {
        surface: "admin",
        status: auth.into_inner().status,
    })
}

pub async fn company_dashboard(auth: Subject<CompanyOnly>) -> Json<DashboardSurface> {
    Json(DashboardSurface {
        surface: "company",
        status: auth.into_inner().status,
    })
}

pub async fn candidate_dashboard(auth: Subject<CandidateOnly>) -> Json<DashboardSurface> {
    Json(DashboardSurface {
        surface: "candidate",
        status: auth.into_inner().status,
    })
}
