use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use super::PagesState;
use crate::auth::{AuthContext, is_login_target, is_safe_callback};
use crate::dashboard::DASHBOARD_PATH;

#[derive(Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    callback_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginPrompt {
    authenticated: bool,
    callback_url: String,
}

/// Login surface. Signed-in callers go straight back to their callback; the
/// rest get the sanitized callback to hand to the external sign-in flow.
pub async fn login_handler(
    State(state): State<PagesState>,
    ctx: AuthContext,
    Query(query): Query<LoginQuery>,
) -> Response {
    let callback = query
        .callback_url
        .as_deref()
        .filter(|c| is_safe_callback(c))
        // Sending a signed-in user back to login would loop
        .filter(|c| !is_login_target(&state.login_path, c))
        .unwrap_or(DASHBOARD_PATH);

    if ctx.is_authenticated() {
        return Redirect::temporary(callback).into_response();
    }

    Json(LoginPrompt {
        authenticated: false,
        callback_url: callback.to_string(),
    })
    .into_response()
}
