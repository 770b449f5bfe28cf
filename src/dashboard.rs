//! Role-based dashboard routing.
//!
//! A `DashboardRouter` watches session-state observations for one subject and
//! emits at most one redirect, on the first observation of an authenticated
//! session.

use crate::db::Role;

/// Entry point that hands out the role-specific surfaces.
pub const DASHBOARD_PATH: &str = "/dashboard";

pub const ADMIN_DASHBOARD_PATH: &str = "/dashboard/admin";
pub const COMPANY_DASHBOARD_PATH: &str = "/dashboard/company";
pub const CANDIDATE_DASHBOARD_PATH: &str = "/dashboard/candidate";

/// Session state as observed by a dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session not known yet
    Loading,
    /// Session known; role may be missing from the record
    Authenticated(Option<Role>),
    /// No session; nothing is rendered until sign-in happens elsewhere
    Unauthenticated,
}

/// Role-specific dashboard surface. Missing roles get the candidate surface.
pub fn dashboard_path(role: Option<Role>) -> &'static str {
    match role.unwrap_or_default() {
        Role::Admin => ADMIN_DASHBOARD_PATH,
        Role::Company => COMPANY_DASHBOARD_PATH,
        Role::Candidate => CANDIDATE_DASHBOARD_PATH,
    }
}

/// Redirect-once router for a single subject's session.
#[derive(Debug, Default)]
pub struct DashboardRouter {
    redirected: bool,
}

impl DashboardRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a session-state observation. Returns the redirect target the first
    /// time an authenticated state is seen, and `None` ever after.
    pub fn observe(&mut self, state: SessionState) -> Option<&'static str> {
        match state {
            SessionState::Authenticated(role) if !self.redirected => {
                self.redirected = true;
                Some(dashboard_path(role))
            }
            _ => None,
        }
    }

    pub fn has_redirected(&self) -> bool {
        self.redirected
    }
}
