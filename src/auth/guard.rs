//! Route guard for protected page paths.
//!
//! The guard only checks that a valid session token is present. It never
//! touches the user store; role checks happen in the handlers behind it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;
use url::form_urlencoded;

use super::context::AuthContext;
use super::identity::{IdentityClaim, IdentityProvider};

/// Query parameter carrying the originally requested path to the login surface.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Paths protected when no `--protect` option is given.
pub const DEFAULT_PROTECTED_PATHS: &[&str] = &["/advice", "/dashboard", "/jobs/*/apply"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

/// A protected path pattern.
///
/// `*` matches exactly one non-empty segment. A pattern matches any path whose
/// leading segments match it, so `/dashboard` also covers `/dashboard/admin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PatternError {
    /// Patterns must start with '/'
    NotAbsolute(String),
    /// Patterns must name at least one segment
    Empty(String),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::NotAbsolute(p) => write!(f, "Protected path must start with '/': {}", p),
            PatternError::Empty(p) => write!(f, "Protected path has no segments: {}", p),
        }
    }
}

impl std::error::Error for PatternError {}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::NotAbsolute(raw.to_string()));
        }
        let segments: Vec<Segment> = split_segments(raw)
            .map(|s| match s {
                "*" => Segment::Wildcard,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        if segments.is_empty() {
            return Err(PatternError::Empty(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut path_segments = split_segments(path);
        self.segments.iter().all(|segment| match path_segments.next() {
            None => false,
            Some(part) => match segment {
                Segment::Wildcard => true,
                Segment::Literal(literal) => literal == part,
            },
        })
    }
}

/// Ordered set of protected path patterns.
#[derive(Debug, Clone, Default)]
pub struct ProtectedPaths {
    patterns: Vec<PathPattern>,
}

impl ProtectedPaths {
    pub fn parse<I, T>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The built-in protected set.
    pub fn defaults() -> Self {
        // The built-in patterns are all absolute and non-empty
        Self::parse(DEFAULT_PROTECTED_PATHS).unwrap_or_default()
    }

    /// The first pattern covering `path`, if any.
    pub fn matching(&self, path: &str) -> Option<&PathPattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.matching(path).is_some()
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }
}

/// Outcome of guarding a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    RedirectTo(String),
}

/// Decides whether requests to protected paths may proceed.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    protected: ProtectedPaths,
    login_path: String,
}

impl RouteGuard {
    pub fn new(protected: ProtectedPaths, login_path: impl Into<String>) -> Self {
        Self {
            protected,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.is_protected(path)
    }

    /// Decide for a request target (`path` or `path?query`).
    pub fn decide(&self, target: &str, claim: Option<&IdentityClaim>) -> GuardDecision {
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        if !self.is_protected(path) || claim.is_some() {
            return GuardDecision::Proceed;
        }
        GuardDecision::RedirectTo(login_redirect(&self.login_path, target))
    }
}

/// Build `<login_path>?callbackUrl=<encoded target>`.
pub fn login_redirect(login_path: &str, target: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(CALLBACK_PARAM, target)
        .finish();
    format!("{}?{}", login_path, query)
}

/// Whether a callback is a same-origin relative path that is safe to redirect to.
/// It must also be usable verbatim as a `Location` header value.
pub fn is_safe_callback(callback: &str) -> bool {
    callback.starts_with('/')
        && !callback.starts_with("//")
        && !callback.contains('\\')
        && !callback.chars().any(char::is_control)
        && HeaderValue::from_str(callback).is_ok()
}

/// Whether `target` is the login surface itself (with or without a query,
/// fragment or sub-path), as opposed to a path that merely shares its prefix.
pub fn is_login_target(login_path: &str, target: &str) -> bool {
    match target.strip_prefix(login_path) {
        Some(rest) => rest.is_empty() || rest.starts_with(['?', '/', '#']),
        None => false,
    }
}

/// State for the guard middleware.
#[derive(Clone)]
pub struct GuardState {
    pub guard: Arc<RouteGuard>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Middleware enforcing the route guard. Unprotected paths pass straight through.
pub async fn route_guard(
    State(state): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.guard.is_protected(request.uri().path()) {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let claim = state.identity.verify(request.headers());

    match state.guard.decide(&target, claim.as_ref()) {
        GuardDecision::Proceed => {
            if let Some(claim) = claim {
                request
                    .extensions_mut()
                    .insert(AuthContext::authenticated(claim));
            }
            next.run(request).await
        }
        GuardDecision::RedirectTo(location) => {
            debug!(path = %target, "Redirecting unauthenticated request to login");
            Redirect::temporary(&location).into_response()
        }
    }
}
