//! Cookie and header parsing for session tokens.

use axum::http::{HeaderMap, header};

/// Cookie name for the provider session token.
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// Cookie name used by the provider when it runs behind HTTPS.
pub const SECURE_SESSION_COOKIE_NAME: &str = "__Secure-session_token";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Extract a bearer token from the Authorization header.
pub fn get_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Find the session token: Authorization header first, then the session cookies.
pub fn get_session_token(headers: &HeaderMap) -> Option<&str> {
    let non_empty = |name: &str| get_cookie(headers, name).filter(|t| !t.is_empty());
    get_bearer_token(headers)
        .or_else(|| non_empty(SESSION_COOKIE_NAME))
        .or_else(|| non_empty(SECURE_SESSION_COOKIE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_get_cookie_simple() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_token=abc123"),
        );

        assert_eq!(get_cookie(&headers, "session_token"), Some("abc123"));
    }

    #[test]
    fn test_get_cookie_multiple() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session_token=abc123; theme=dark"),
        );

        assert_eq!(get_cookie(&headers, "session_token"), Some("abc123"));
        assert_eq!(get_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(get_cookie(&headers, "foo"), Some("bar"));
    }

    #[test]
    fn test_get_cookie_not_found() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("foo=bar"));

        assert_eq!(get_cookie(&headers, "session_token"), None);
    }

    #[test]
    fn test_get_cookie_with_spaces() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("  session_token = abc123  ; foo=bar"),
        );

        assert_eq!(get_cookie(&headers, "session_token"), Some("abc123"));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok-1"),
        );
        assert_eq!(get_bearer_token(&headers), Some("tok-1"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(get_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(get_bearer_token(&headers), None);
    }

    #[test]
    fn test_session_token_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("__Secure-session_token=secure; session_token=plain"),
        );
        assert_eq!(get_session_token(&headers), Some("plain"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header"),
        );
        assert_eq!(get_session_token(&headers), Some("header"));
    }

    #[test]
    fn test_session_token_empty_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token="));
        assert_eq!(get_session_token(&headers), None);
    }

    #[test]
    fn test_empty_cookie_falls_through_to_secure_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_token=; __Secure-session_token=secure"),
        );
        assert_eq!(get_session_token(&headers), Some("secure"));
    }
}
