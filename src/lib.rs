pub mod api;
pub mod auth;
pub mod cli;
pub mod dashboard;
pub mod db;
pub mod jwt;
pub mod pages;

use api::create_api_router;
use auth::{GuardState, IdentityProvider, JwtIdentityProvider, ProtectedPaths, RouteGuard};
use axum::{Router, middleware};
use db::Database;
use jwt::JwtConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Default path of the login surface.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Secret shared with the auth provider for verifying session tokens
    pub jwt_secret: Vec<u8>,
    /// Paths that require a session
    pub protected_paths: ProtectedPaths,
    /// Where unauthenticated requests to protected paths are sent
    pub login_path: String,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(
        JwtConfig::new(&config.jwt_secret),
    ));
    create_app_with_identity(config, identity)
}

/// Create the application router with a custom identity provider.
pub fn create_app_with_identity(
    config: &ServerConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Router {
    let guard_state = GuardState {
        guard: Arc::new(RouteGuard::new(
            config.protected_paths.clone(),
            config.login_path.clone(),
        )),
        identity: identity.clone(),
    };

    let pages_state = pages::PagesState {
        db: config.db.clone(),
        identity: identity.clone(),
        login_path: config.login_path.clone(),
    };

    Router::new()
        .nest("/api", create_api_router(config.db.clone(), identity))
        .merge(pages::router(pages_state))
        .layer(middleware::from_fn_with_state(guard_state, auth::route_guard))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
