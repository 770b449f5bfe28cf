//! Axum extractors for role-gated endpoints.

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::context::AuthContext;
use super::errors::{ApiAuthError, AuthErrorKind};
use super::resolver::{RoleResolver, SubjectStatus};
use super::state::HasAuthBackend;
use crate::db::{Role, User};

/// Which roles an extractor admits.
pub trait RoleConstraint {
    fn allows(role: Role) -> bool;
}

/// Any resolved subject, whatever its role.
pub struct AnyRole;

impl RoleConstraint for AnyRole {
    fn allows(_: Role) -> bool {
        true
    }
}

pub struct AdminOnly;

impl RoleConstraint for AdminOnly {
    fn allows(role: Role) -> bool {
        role == Role::Admin
    }
}

pub struct CompanyOnly;

impl RoleConstraint for CompanyOnly {
    fn allows(role: Role) -> bool {
        role == Role::Company
    }
}

pub struct CandidateOnly;

impl RoleConstraint for CandidateOnly {
    fn allows(role: Role) -> bool {
        role == Role::Candidate
    }
}

/// A subject whose identity was verified and whose user record was found.
#[derive(Debug, Clone)]
pub struct ResolvedSubject {
    pub user: User,
    pub status: SubjectStatus,
}

/// Extractor for endpoints that need a resolved subject with an allowed role.
/// Returns JSON errors instead of redirects.
pub struct Subject<R: RoleConstraint = AnyRole> {
    pub subject: ResolvedSubject,
    _role: PhantomData<R>,
}

impl<R: RoleConstraint> Subject<R> {
    pub fn into_inner(self) -> ResolvedSubject {
        self.subject
    }
}

impl<S, R> FromRequestParts<S> for Subject<R>
where
    S: HasAuthBackend + Send + Sync,
    R: RoleConstraint,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = match AuthContext::from_request_parts(parts, state).await {
            Ok(ctx) => ctx,
            Err(never) => match never {},
        };

        let resolver = RoleResolver::new(state.db().clone());
        let user = resolver.resolve_user(ctx.claim()).await?;
        let status = SubjectStatus::from(&user);

        if !R::allows(status.role) {
            return Err(ApiAuthError::new(AuthErrorKind::InsufficientRole));
        }

        Ok(Subject {
            subject: ResolvedSubject { user, status },
            _role: PhantomData,
        })
    }
}
