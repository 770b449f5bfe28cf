mod common;

use axum::http::StatusCode;
use common::{create_test_app, get, json_body, put_json, session_token};
use portalgate::db::{Database, Role, UserFilter};
use serde_json::json;
use tower::ServiceExt;

const ADMIN_UUID: &str = "00000000-0000-0000-0000-000000000001";
const USER_UUID: &str = "00000000-0000-0000-0000-000000000002";

async fn setup_users(db: &Database) -> (String, String) {
    db.users()
        .create(ADMIN_UUID, "admin@example.com", Some("acct-admin"), Role::Admin)
        .await
        .unwrap();
    db.users()
        .create(USER_UUID, "co@example.com", Some("acct-co"), Role::Company)
        .await
        .unwrap();
    (
        session_token(Some("acct-admin"), None),
        session_token(Some("acct-co"), None),
    )
}

// --- Access control ---

#[tokio::test]
async fn test_admin_users_requires_auth() {
    let (app, _db) = create_test_app().await;

    let response = app.oneshot(get("/api/admin/users", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_users_requires_admin_role() {
    let (app, db) = create_test_app().await;
    let (_, company) = setup_users(&db).await;

    let response = app
        .oneshot(get("/api/admin/users", Some(&company)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await, json!({ "error": "Forbidden" }));
}

#[tokio::test]
async fn test_admin_without_record_is_not_found() {
    let (app, _db) = create_test_app().await;
    let token = session_token(Some("acct-nobody"), None);

    let response = app
        .oneshot(get("/api/admin/stats", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// --- Listing ---

#[tokio::test]
async fn test_admin_users_list() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    let response = app
        .oneshot(get("/api/admin/users", Some(&admin)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let users = json.as_array().unwrap();
    assert_eq!(users.len(), 2);
    let company = users
        .iter()
        .find(|u| u["uuid"] == USER_UUID)
        .expect("company user listed");
    assert_eq!(company["email"], "co@example.com");
    assert_eq!(company["role"], "company");
    assert_eq!(company["isVerified"], false);
}

#[tokio::test]
async fn test_admin_stats() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;
    sqlx::query("INSERT INTO users (uuid, email) VALUES ('legacy', 'old@example.com')")
        .execute(db.pool())
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/admin/stats", Some(&admin)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["verified"], 0);
    let candidates = json["byRole"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["role"] == "candidate")
        .expect("legacy rows count as candidates");
    assert_eq!(candidates["count"], 1);
}

// --- Role changes ---

#[tokio::test]
async fn test_set_role() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    let response = app
        .oneshot(put_json(
            &format!("/api/admin/users/{}/role", USER_UUID),
            &admin,
            json!({ "role": "candidate" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["role"], "candidate");

    let user = db
        .users()
        .find_one(UserFilter::ProviderAccountId("acct-co"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, Some(Role::Candidate));
}

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    let response = app
        .oneshot(put_json(
            &format!("/api/admin/users/{}/role", ADMIN_UUID),
            &admin,
            json!({ "role": "company" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_role_unknown_user() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/admin/users/00000000-0000-0000-0000-000000000099/role",
            &admin,
            json!({ "role": "company" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "User not found" }));

    let response = app
        .oneshot(put_json(
            "/api/admin/users/not-a-uuid/role",
            &admin,
            json!({ "role": "company" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// --- Verification changes ---

#[tokio::test]
async fn test_set_verification() {
    let (app, db) = create_test_app().await;
    let (admin, company) = setup_users(&db).await;

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/admin/users/{}/verification", USER_UUID),
            &admin,
            json!({
                "isVerified": true,
                "verifiedAt": "2024-01-01",
                "verificationType": "document",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/user/verification-status", Some(&company)))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await,
        json!({
            "isVerified": true,
            "verifiedAt": "2024-01-01",
            "verificationType": "document",
            "userRole": "company",
        })
    );
}

#[tokio::test]
async fn test_set_verification_defaults_timestamp() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    let response = app
        .oneshot(put_json(
            &format!("/api/admin/users/{}/verification", USER_UUID),
            &admin,
            json!({ "isVerified": true, "verificationType": "manual" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["isVerified"], true);
    assert!(json["verifiedAt"].is_string());
}

#[tokio::test]
async fn test_clear_verification() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    for verified in [true, false] {
        let response = app
            .clone()
            .oneshot(put_json(
                &format!("/api/admin/users/{}/verification", USER_UUID),
                &admin,
                json!({ "isVerified": verified }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let user = db.users().get_by_uuid(USER_UUID).await.unwrap().unwrap();
    assert_eq!(user.is_verified, Some(false));
    assert!(user.verified_at.is_none());
    assert!(user.verification_type.is_none());
}

#[tokio::test]
async fn test_inconsistent_verification_rejected() {
    let (app, db) = create_test_app().await;
    let (admin, _) = setup_users(&db).await;

    for body in [
        json!({ "isVerified": false, "verifiedAt": "2024-01-01" }),
        json!({ "isVerified": false, "verificationType": "email" }),
        json!({ "isVerified": true, "verifiedAt": "yesterday" }),
    ] {
        let response = app
            .clone()
            .oneshot(put_json(
                &format!("/api/admin/users/{}/verification", USER_UUID),
                &admin,
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let user = db.users().get_by_uuid(USER_UUID).await.unwrap().unwrap();
    assert_eq!(user.is_verified, Some(false));
}
