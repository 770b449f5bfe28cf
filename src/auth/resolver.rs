//! Role and verification-state resolution for verified identities.

use serde::Serialize;
use tracing::error;

use super::identity::IdentityClaim;
use crate::db::{Database, Role, User, UserFilter, VerificationType};

/// Role and verification state of a subject, with defaults applied.
///
/// Defaults: missing role is `candidate`, missing verification flag is
/// `false`, missing timestamp and method are `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStatus {
    pub role: Role,
    pub is_verified: bool,
    pub verified_at: Option<String>,
    pub verification_type: Option<VerificationType>,
}

impl From<&User> for SubjectStatus {
    fn from(user: &User) -> Self {
        let defaults = SubjectStatus::default();
        Self {
            role: user.role.unwrap_or(defaults.role),
            is_verified: user.is_verified.unwrap_or(defaults.is_verified),
            verified_at: user.verified_at.clone(),
            verification_type: user.verification_type,
        }
    }
}

/// Why a subject could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// No verified identity on the request
    Unauthorized,
    /// Verified identity without a backing user record
    NotFound,
    /// The user store failed
    Internal,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Unauthorized => write!(f, "No verified identity"),
            ResolveError::NotFound => write!(f, "No user record for identity"),
            ResolveError::Internal => write!(f, "User store failure"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Looks up the user record behind a verified identity.
#[derive(Clone)]
pub struct RoleResolver {
    db: Database,
}

impl RoleResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find the user record for a claim.
    ///
    /// The provider account id is authoritative when present; email is only
    /// consulted for claims that carry no account id, so an email-only record
    /// can never shadow a record keyed by provider identity.
    pub async fn resolve_user(&self, claim: Option<&IdentityClaim>) -> Result<User, ResolveError> {
        let claim = claim.ok_or(ResolveError::Unauthorized)?;

        let filter = match (&claim.provider_account_id, &claim.email) {
            (Some(account_id), _) => UserFilter::ProviderAccountId(account_id),
            (None, Some(email)) => UserFilter::Email(email),
            (None, None) => return Err(ResolveError::Unauthorized),
        };

        self.db
            .users()
            .find_one(filter)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up user");
                ResolveError::Internal
            })?
            .ok_or(ResolveError::NotFound)
    }

    /// Resolve the role and verification state for a claim.
    pub async fn resolve(
        &self,
        claim: Option<&IdentityClaim>,
    ) -> Result<SubjectStatus, ResolveError> {
        let user = self.resolve_user(claim).await?;
        Ok(SubjectStatus::from(&user))
    }
}
