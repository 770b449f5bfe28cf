mod admin;
mod error;
mod verification;

use axum::Router;
use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::db::Database;

pub use error::{ApiError, ResultExt};
pub use verification::VerificationStatusResponse;

/// Create the API router.
pub fn create_api_router(db: Database, identity: Arc<dyn IdentityProvider>) -> Router {
    let verification_state = verification::VerificationState {
        db: db.clone(),
        identity: identity.clone(),
    };

    let admin_state = admin::AdminState { db, identity };

    Router::new()
        .nest("/user", verification::router(verification_state))
        .nest("/admin", admin::router(admin_state))
}
