use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use student_management_backend::models::user::{User, UserRole};
use tower::ServiceExt;

mod support;

use support::{
    bearer_for, body_json, empty_request, integration_guard, json_request, seed_user, test_app,
    test_pool, TEST_PASSWORD,
};

async fn login(app: &axum::Router, user: &User) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": user.username, "password": TEST_PASSWORD }),
        ))
        .await
        .expect("call login");
    let status = response.status();
    (status, body_json(response).await)
}

async fn active_session_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE active")
        .fetch_one(pool)
        .await
        .expect("count sessions")
}

async fn slot_holder(pool: &PgPool) -> Option<uuid::Uuid> {
    sqlx::query_scalar("SELECT session_id FROM session_slot WHERE id = 1")
        .fetch_one(pool)
        .await
        .expect("read slot")
}

fn registration(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "phone": "+1 555 010 0200",
        "password": "analytical-engine"
    })
}

#[tokio::test]
async fn register_creates_student_and_rejects_duplicates() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            registration("ada", "ada@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["user"].get("password_hash").is_none());

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            registration("ada", "other@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Username already exists");

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            registration("ada2", "ada@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Email already exists");
}

#[tokio::test]
async fn register_lists_missing_fields() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            json!({ "username": "grace", "first_name": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["details"]["missing_fields"],
        json!(["first_name", "last_name", "email", "phone", "password"])
    );
}

#[tokio::test]
async fn register_rejects_invalid_formats() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool);

    let mut payload = registration("bad name!", "not-an-email");
    payload["phone"] = json!("call me");
    let response = app
        .oneshot(json_request(Method::POST, "/api/auth/register", None, payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["errors"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn login_requires_username_and_password() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": "someone" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["details"]["missing_fields"], json!(["password"]));
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized_and_creates_no_session() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let user = seed_user(&pool, UserRole::Student).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": user.username, "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": "whatever1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(active_session_count(&pool).await, 0);
    assert_eq!(slot_holder(&pool).await, None);
}

#[tokio::test]
async fn login_issues_tokens_and_claims_the_slot() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let user = seed_user(&pool, UserRole::Teacher).await;

    let (status, body) = login(&app, &user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["message"], "Login successful");
    let access = body["access_token"].as_str().expect("access token");
    assert!(body["refresh_token"].as_str().expect("refresh").contains('.'));

    assert_eq!(active_session_count(&pool).await, 1);
    assert!(slot_holder(&pool).await.is_some());

    let response = app
        .oneshot(empty_request(Method::GET, "/api/auth/profile", Some(access)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], json!(user.username));
}

#[tokio::test]
async fn login_is_rejected_while_any_session_is_active() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let first = seed_user(&pool, UserRole::Student).await;
    let second = seed_user(&pool, UserRole::Admin).await;

    let (status, _) = login(&app, &first).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(&app, &second).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Same user is rejected too.
    let (status, _) = login(&app, &first).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(active_session_count(&pool).await, 1);
}

#[tokio::test]
async fn expired_sessions_are_swept_before_the_active_check() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let first = seed_user(&pool, UserRole::Student).await;
    let second = seed_user(&pool, UserRole::Student).await;

    let (status, _) = login(&app, &first).await;
    assert_eq!(status, StatusCode::OK);
    sqlx::query("UPDATE sessions SET expires_at = NOW() - INTERVAL '1 minute'")
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = login(&app, &second).await;
    assert_eq!(status, StatusCode::OK);

    let states: Vec<(uuid::Uuid, bool)> =
        sqlx::query_as("SELECT user_id, active FROM sessions ORDER BY created_at")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0], (*first.id.as_uuid(), false));
    assert_eq!(states[1], (*second.id.as_uuid(), true));
}

#[tokio::test]
async fn logout_without_active_session_is_not_found() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let user = seed_user(&pool, UserRole::Student).await;

    let response = app
        .oneshot(empty_request(
            Method::POST,
            "/api/auth/logout",
            Some(&bearer_for(&user)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn logout_blacklists_the_access_token_and_frees_the_slot() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let user = seed_user(&pool, UserRole::Student).await;
    let other = seed_user(&pool, UserRole::Teacher).await;

    let (_, body) = login(&app, &user).await;
    let access = body["access_token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/api/auth/logout", Some(&access)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Successfully logged out");

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/auth/profile", Some(&access)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(active_session_count(&pool).await, 0);
    assert_eq!(slot_holder(&pool).await, None);
    let revoked: bool = sqlx::query_scalar(
        "SELECT revoked_at IS NOT NULL FROM refresh_tokens WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(revoked);

    let (status, _) = login(&app, &other).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_issues_new_access_token_until_logout() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let user = seed_user(&pool, UserRole::Teacher).await;

    let (_, body) = login(&app, &user).await;
    let original_access = body["access_token"].as_str().unwrap().to_string();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/token/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    let new_access = refreshed["access_token"].as_str().unwrap().to_string();
    assert_ne!(new_access, original_access);

    // The superseded token is blacklisted.
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/auth/profile", Some(&original_access)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/api/auth/logout", Some(&new_access)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/token/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rejects_malformed_and_tampered_tokens() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let user = seed_user(&pool, UserRole::Student).await;
    let (_, body) = login(&app, &user).await;
    let refresh_token = body["refresh_token"].as_str().unwrap();
    let (id, _) = refresh_token.split_once('.').unwrap();

    let tampered = format!("{}.wrong-secret", id);
    for candidate in ["garbage", tampered.as_str()] {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/auth/token/refresh",
                None,
                json!({ "refresh_token": candidate }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{candidate}");
    }
}

#[tokio::test]
async fn concurrent_logins_cannot_both_succeed() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let first = seed_user(&pool, UserRole::Student).await;
    let second = seed_user(&pool, UserRole::Teacher).await;

    let ((a, _), (b, _)) = tokio::join!(login(&app, &first), login(&app, &second));
    let mut statuses = vec![a.as_u16(), b.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![200, 403]);
    assert_eq!(active_session_count(&pool).await, 1);
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool);

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/auth/profile", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = app
        .oneshot(empty_request(
            Method::GET,
            "/api/auth/profile",
            Some("not-a-jwt"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn responses_echo_request_id() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool);

    let mut request = empty_request(Method::GET, "/api/auth/profile", None);
    request
        .headers_mut()
        .insert("x-request-id", "req-123".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}
