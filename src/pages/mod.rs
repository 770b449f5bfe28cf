//! Page-level routes: the login surface and the dashboard entry points.
//!
//! Rendering happens in the frontend; these handlers only decide where a
//! subject belongs and hand back the data the view needs.

mod dashboard;
mod login;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::dashboard::{
    ADMIN_DASHBOARD_PATH, CANDIDATE_DASHBOARD_PATH, COMPANY_DASHBOARD_PATH, DASHBOARD_PATH,
};
use crate::db::Database;
use crate::impl_has_auth_backend;

/// State for page handlers.
#[derive(Clone)]
pub struct PagesState {
    pub db: Database,
    pub identity: Arc<dyn IdentityProvider>,
    pub login_path: String,
}

impl_has_auth_backend!(PagesState);

pub fn router(state: PagesState) -> Router {
    let login_path = state.login_path.clone();
    Router::new()
        .route(&login_path, get(login::login_handler))
        .route(DASHBOARD_PATH, get(dashboard::dashboard_entry))
        .route(ADMIN_DASHBOARD_PATH, get(dashboard::admin_dashboard))
        .route(COMPANY_DASHBOARD_PATH, get(dashboard::company_dashboard))
        .route(CANDIDATE_DASHBOARD_PATH, get(dashboard::candidate_dashboard))
        .with_state(state)
}
