use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// User role for authorization and dashboard selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role. Unknown values yield `None` and fall back to the default role.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "candidate" => Some(Role::Candidate),
            "company" => Some(Role::Company),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// How a subject completed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationType {
    Email,
    Phone,
    Document,
    Manual,
}

impl VerificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::Email => "email",
            VerificationType::Phone => "phone",
            VerificationType::Document => "document",
            VerificationType::Manual => "manual",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "email" => Some(VerificationType::Email),
            "phone" => Some(VerificationType::Phone),
            "document" => Some(VerificationType::Document),
            "manual" => Some(VerificationType::Manual),
            _ => None,
        }
    }
}

/// A stored user record. Optional fields are `None` when the column is unset.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub uuid: String,
    pub email: String,
    pub provider_account_id: Option<String>,
    pub role: Option<Role>,
    pub is_verified: Option<bool>,
    pub verified_at: Option<String>,
    pub verification_type: Option<VerificationType>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    uuid: String,
    email: String,
    provider_account_id: Option<String>,
    role: Option<String>,
    is_verified: Option<i32>,
    verified_at: Option<String>,
    verification_type: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            email: row.email,
            provider_account_id: row.provider_account_id,
            role: row.role.as_deref().and_then(Role::from_db),
            is_verified: row.is_verified.map(|v| v != 0),
            verified_at: row.verified_at,
            verification_type: row
                .verification_type
                .as_deref()
                .and_then(VerificationType::from_db),
        }
    }
}

macro_rules! select_user {
    ($where:literal) => {
        concat!(
            "SELECT id, uuid, email, provider_account_id, role, is_verified, verified_at, verification_type FROM users ",
            $where
        )
    };
}

/// Lookup key for a single user record.
#[derive(Debug, Clone, Copy)]
pub enum UserFilter<'a> {
    ProviderAccountId(&'a str),
    Email(&'a str),
}

/// Verification state to write. There is no way to express "verified" without
/// a timestamp or "unverified" with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Unverified,
    Verified {
        /// `None` stamps the write time.
        at: Option<String>,
        kind: Option<VerificationType>,
    },
}

/// Rejected verification input.
#[derive(Debug, PartialEq, Eq)]
pub enum VerificationError {
    /// A timestamp or method was supplied for an unverified subject.
    DetailsWithoutVerification,
    /// The timestamp is not `YYYY-MM-DD` optionally followed by a time part.
    InvalidTimestamp,
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::DetailsWithoutVerification => {
                write!(f, "verifiedAt and verificationType require isVerified")
            }
            VerificationError::InvalidTimestamp => write!(f, "verifiedAt is not a valid timestamp"),
        }
    }
}

impl std::error::Error for VerificationError {}

impl Verification {
    /// Build a verification state from loosely-typed input, enforcing that the
    /// timestamp only exists for verified subjects.
    pub fn from_parts(
        is_verified: bool,
        at: Option<String>,
        kind: Option<VerificationType>,
    ) -> Result<Self, VerificationError> {
        if !is_verified {
            if at.is_some() || kind.is_some() {
                return Err(VerificationError::DetailsWithoutVerification);
            }
            return Ok(Verification::Unverified);
        }

        if let Some(ref at) = at {
            if !is_timestamp(at) {
                return Err(VerificationError::InvalidTimestamp);
            }
        }

        Ok(Verification::Verified { at, kind })
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by `T` or a space and a time part.
fn is_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let date_ok = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !date_ok {
        return false;
    }
    match bytes.get(10) {
        None => true,
        Some(b'T') | Some(b' ') => bytes.len() > 11,
        Some(_) => false,
    }
}

/// Public user summary for the admin dashboard. Does not expose internal database IDs.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub uuid: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    uuid: String,
    email: String,
    role: Option<String>,
    is_verified: Option<i32>,
    created_at: String,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        Self {
            uuid: row.uuid,
            email: row.email,
            role: row
                .role
                .as_deref()
                .and_then(Role::from_db)
                .unwrap_or_default(),
            is_verified: row.is_verified.unwrap_or(0) != 0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCount {
    pub role: Role,
    pub count: i64,
    pub verified: i64,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: i64,
    pub verified: i64,
    pub by_role: Vec<RoleCount>,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new unverified user. Returns the user ID.
    pub async fn create(
        &self,
        uuid: &str,
        email: &str,
        provider_account_id: Option<&str>,
        role: Role,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (uuid, email, provider_account_id, role, is_verified) VALUES (?, ?, ?, ?, 0)",
        )
        .bind(uuid)
        .bind(email)
        .bind(provider_account_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Find a single user matching the filter.
    pub async fn find_one(&self, filter: UserFilter<'_>) -> Result<Option<User>, sqlx::Error> {
        let (query, value) = match filter {
            UserFilter::ProviderAccountId(id) => (
                select_user!("WHERE provider_account_id = ?"),
                id,
            ),
            UserFilter::Email(email) => (select_user!("WHERE email = ?"), email),
        };
        let row: Option<UserRow> = sqlx::query_as(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by UUID.
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(select_user!("WHERE uuid = ?"))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Set the role for a user.
    pub async fn set_role(&self, id: i64, role: Role) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write the verification state for a user. All three columns change together.
    pub async fn set_verification(
        &self,
        id: i64,
        verification: &Verification,
    ) -> Result<bool, sqlx::Error> {
        let result = match verification {
            Verification::Unverified => {
                sqlx::query(
                    "UPDATE users SET is_verified = 0, verified_at = NULL, verification_type = NULL WHERE id = ?",
                )
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            Verification::Verified { at, kind } => {
                sqlx::query(
                    "UPDATE users SET is_verified = 1, verified_at = COALESCE(?, datetime('now')), verification_type = ? WHERE id = ?",
                )
                .bind(at.as_deref())
                .bind(kind.map(|k| k.as_str()))
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all users (for admin dashboard). Does not expose internal IDs.
    pub async fn list(&self) -> Result<Vec<UserSummary>, sqlx::Error> {
        let rows: Vec<UserSummaryRow> = sqlx::query_as(
            "SELECT uuid, email, role, is_verified, created_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    /// Count users per role, with verified counts.
    pub async fn stats(&self) -> Result<UserStats, sqlx::Error> {
        let rows: Vec<(Option<String>, i64, i64)> = sqlx::query_as(
            "SELECT role, COUNT(*), COALESCE(SUM(COALESCE(is_verified, 0)), 0) FROM users GROUP BY role",
        )
        .fetch_all(&self.pool)
        .await?;

        // NULL and unknown roles are merged into the default role bucket
        let mut by_role: Vec<RoleCount> = Vec::new();
        for (role, count, verified) in rows {
            let role = role.as_deref().and_then(Role::from_db).unwrap_or_default();
            match by_role.iter_mut().find(|r| r.role == role) {
                Some(existing) => {
                    existing.count += count;
                    existing.verified += verified;
                }
                None => by_role.push(RoleCount {
                    role,
                    count,
                    verified,
                }),
            }
        }
        by_role.sort_by_key(|r| r.role.as_str());

        Ok(UserStats {
            total: by_role.iter().map(|r| r.count).sum(),
            verified: by_role.iter().map(|r| r.verified).sum(),
            by_role,
        })
    }
}
