//! CLI argument parsing, validation, and startup helpers.

use crate::auth::{DEFAULT_PROTECTED_PATHS, ProtectedPaths};
use crate::db::{Database, Role, UserFilter};
use crate::{DEFAULT_LOGIN_PATH, ServerConfig};
use clap::Parser;
use tracing::{error, info};
use uuid::Uuid;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "portalgate",
    about = "Session-gated authorization for the job portal"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7300", env = "PORTALGATE_PORT")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "portalgate.db", env = "PORTALGATE_DATABASE")]
    pub database: String,

    /// Path to file containing the session token secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Path pattern requiring a session; repeat for several. `*` matches one segment
    #[arg(long = "protect", value_name = "PATTERN", default_values = DEFAULT_PROTECTED_PATHS)]
    pub protected_paths: Vec<String>,

    /// Login surface that unauthenticated requests are redirected to
    #[arg(long, default_value = DEFAULT_LOGIN_PATH, value_parser = validate_login_path)]
    pub login_path: String,

    /// Grant the admin role to the user with this email, creating the user if needed
    #[arg(long, value_name = "EMAIL")]
    pub create_admin: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_login_path(s: &str) -> Result<String, String> {
    if !s.starts_with('/') || s.starts_with("//") {
        return Err(format!("Login path must be an absolute path: {}", s));
    }

    if s.contains('?') || s.contains('#') {
        return Err(format!("Login path must not carry a query or fragment: {}", s));
    }

    if s.chars().any(|c| !c.is_ascii() || c.is_whitespace()) {
        return Err(format!("Login path contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Parse the protected path patterns.
/// Returns None and logs an error if any pattern is invalid.
pub fn parse_protected_paths(patterns: &[String]) -> Option<ProtectedPaths> {
    match ProtectedPaths::parse(patterns) {
        Ok(paths) => {
            for pattern in paths.patterns() {
                info!(pattern = pattern.as_str(), "Protecting path");
            }
            Some(paths)
        }
        Err(e) => {
            error!(error = %e, "Invalid protected path");
            None
        }
    }
}

/// Handle the --create-admin flag: promote an existing user or create a new admin.
pub async fn handle_create_admin(db: &Database, email: &str) -> Result<(), sqlx::Error> {
    let users = db.users();

    match users.find_one(UserFilter::Email(email)).await? {
        Some(existing) if existing.role == Some(Role::Admin) => {
            info!(email = %email, uuid = %existing.uuid, "User is already an admin");
        }
        Some(existing) => {
            users.set_role(existing.id, Role::Admin).await?;
            info!(email = %email, uuid = %existing.uuid, "Granted admin role");
        }
        None => {
            let uuid = Uuid::new_v4().to_string();
            users.create(&uuid, email, None, Role::Admin).await?;
            info!(email = %email, uuid = %uuid, "Admin user created");
        }
    }

    Ok(())
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    protected_paths: ProtectedPaths,
    login_path: String,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        protected_paths,
        login_path,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
