mod common;

use axum::http::StatusCode;
use common::{create_test_app, get, json_body, location, session_token};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_prompt_keeps_callback() {
    let (app, _db) = create_test_app().await;

    let response = app
        .oneshot(get("/login?callbackUrl=%2Fjobs%2F7%2Fapply", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "authenticated": false, "callbackUrl": "/jobs/7/apply" })
    );
}

#[tokio::test]
async fn test_login_prompt_defaults_to_dashboard() {
    let (app, _db) = create_test_app().await;

    let response = app.oneshot(get("/login", None)).await.unwrap();

    assert_eq!(
        json_body(response).await,
        json!({ "authenticated": false, "callbackUrl": "/dashboard" })
    );
}

#[tokio::test]
async fn test_login_rejects_offsite_callbacks() {
    let (app, _db) = create_test_app().await;

    for callback in [
        "https%3A%2F%2Fevil.example",
        "%2F%2Fevil.example",
        "%2F%5Cevil.example",
        "%2Flogin%3FcallbackUrl%3D%252Fadvice",
    ] {
        let uri = format!("/login?callbackUrl={}", callback);
        let response = app.clone().oneshot(get(&uri, None)).await.unwrap();
        assert_eq!(
            json_body(response).await["callbackUrl"],
            "/dashboard",
            "{}",
            callback
        );
    }
}

#[tokio::test]
async fn test_signed_in_control_character_callbacks_fall_back() {
    let (app, _db) = create_test_app().await;
    let token = session_token(Some("acct-1"), None);

    for callback in [
        "%2Fadvice%0Ax",
        "%2Fadvice%0D%0ASet-Cookie%3A%20x%3D1",
        "%2Fadvice%00",
        "%2Fadvice%7F",
    ] {
        let uri = format!("/login?callbackUrl={}", callback);
        let response = app.clone().oneshot(get(&uri, Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", callback);
        assert_eq!(location(&response), "/dashboard", "{}", callback);
    }
}

#[tokio::test]
async fn test_callbacks_sharing_login_prefix_are_kept() {
    let (app, _db) = create_test_app().await;

    for callback in ["/login-help", "/loginfaq"] {
        let uri = format!("/login?callbackUrl={}", callback.replace('/', "%2F"));
        let response = app.clone().oneshot(get(&uri, None)).await.unwrap();
        assert_eq!(json_body(response).await["callbackUrl"], callback);
    }
}

#[tokio::test]
async fn test_signed_in_user_is_sent_to_callback() {
    let (app, _db) = create_test_app().await;
    let token = session_token(Some("acct-1"), None);

    let response = app
        .oneshot(get("/login?callbackUrl=%2Fadvice", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/advice");
}

#[tokio::test]
async fn test_guard_redirect_round_trip() {
    let (app, _db) = create_test_app().await;

    let response = app.clone().oneshot(get("/advice", None)).await.unwrap();
    let login = location(&response).to_string();

    let token = session_token(None, Some("someone@example.com"));
    let response = app.oneshot(get(&login, Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/advice");
}
