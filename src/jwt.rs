//! Session token generation and validation.
//!
//! Session tokens are issued by the external auth provider and signed with a
//! secret shared with this service. They are only ever verified here; token
//! generation exists for tooling and tests.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default session duration: 30 days
pub const SESSION_TOKEN_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims carried by a provider session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (provider account id, or email when the provider has none)
    pub sub: String,
    /// Provider account identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// Result of generating a session token.
#[derive(Debug, Clone)]
pub struct SessionTokenResult {
    /// The JWT token string
    pub token: String,
    /// Token duration in seconds
    pub duration: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Generate a session token for a subject.
    /// At least one of `account_id` and `email` must be given.
    pub fn generate_session_token(
        &self,
        account_id: Option<&str>,
        email: Option<&str>,
        duration: u64,
    ) -> Result<SessionTokenResult, JwtError> {
        let sub = account_id.or(email).ok_or(JwtError::MissingSubject)?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::TimeError)?
            .as_secs();

        let claims = SessionClaims {
            sub: sub.to_string(),
            account_id: account_id.map(str::to_string),
            email: email.map(str::to_string),
            iat: now,
            exp: now + duration,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(SessionTokenResult { token, duration })
    }

    /// Validate and decode a session token.
    pub fn validate_session_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
                .map_err(JwtError::Decoding)?;

        let claims = token_data.claims;
        if claims.account_id.is_none() && claims.email.is_none() {
            return Err(JwtError::MissingSubject);
        }

        Ok(claims)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding the token
    Decoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
    /// Token names neither an account id nor an email
    MissingSubject,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
            JwtError::MissingSubject => write!(f, "Token has no account id or email"),
        }
    }
}

impl std::error::Error for JwtError {}
