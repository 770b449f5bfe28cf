//! Session-gated request authorization.
//!
//! A route guard redirects unauthenticated page requests to login, a role
//! resolver maps verified identities to user records, and extractors gate API
//! endpoints by role.

mod context;
mod cookie;
mod errors;
mod extractors;
mod guard;
mod identity;
mod resolver;
mod state;

pub use context::AuthContext;
pub use cookie::{
    SECURE_SESSION_COOKIE_NAME, SESSION_COOKIE_NAME, get_bearer_token, get_cookie,
    get_session_token,
};
pub use errors::{ApiAuthError, AuthErrorKind};
pub use extractors::{
    AdminOnly, AnyRole, CandidateOnly, CompanyOnly, ResolvedSubject, RoleConstraint, Subject,
};
pub use guard::{
    CALLBACK_PARAM, DEFAULT_PROTECTED_PATHS, GuardDecision, GuardState, PathPattern,
    PatternError, ProtectedPaths, RouteGuard, is_login_target, is_safe_callback, login_redirect,
    route_guard,
};
pub use identity::{IdentityClaim, IdentityProvider, JwtIdentityProvider};
pub use resolver::{ResolveError, RoleResolver, SubjectStatus};
pub use state::HasAuthBackend;
