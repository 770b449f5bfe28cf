//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::resolver::ResolveError;

/// Internal auth error kind used by the core authentication logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    NotAuthenticated,
    UserNotFound,
    InsufficientRole,
    Internal,
}

impl From<ResolveError> for AuthErrorKind {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Unauthorized => AuthErrorKind::NotAuthenticated,
            ResolveError::NotFound => AuthErrorKind::UserNotFound,
            ResolveError::Internal => AuthErrorKind::Internal,
        }
    }
}

/// API authentication errors (returns JSON with a generic message).
#[derive(Debug)]
pub struct ApiAuthError {
    pub(super) kind: AuthErrorKind,
}

impl ApiAuthError {
    pub(super) fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    fn status_code(&self) -> StatusCode {
        match self.kind {
            AuthErrorKind::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthErrorKind::UserNotFound => StatusCode::NOT_FOUND,
            AuthErrorKind::InsufficientRole => StatusCode::FORBIDDEN,
            AuthErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::NotAuthenticated => "Unauthorized",
            AuthErrorKind::UserNotFound => "User not found",
            AuthErrorKind::InsufficientRole => "Forbidden",
            AuthErrorKind::Internal => "Internal server error",
        }
    }
}

impl From<ResolveError> for ApiAuthError {
    fn from(e: ResolveError) -> Self {
        Self::new(e.into())
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
