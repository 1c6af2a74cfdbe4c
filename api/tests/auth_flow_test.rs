//! End-to-end tests of the auth endpoints and the role-gated user routes

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use sg_api::{create_app, default_route_policy, AppState};
use sg_core::services::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};
use sg_infra::InMemoryUserRepository;
use sg_shared::Role;

fn test_state() -> web::Data<AppState<InMemoryUserRepository>> {
    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig::with_secret("flow-test-secret")).unwrap(),
    );
    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        token_service,
        AuthServiceConfig::default().with_bcrypt_cost(4),
    ));
    web::Data::new(AppState::new(auth_service))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(create_app($state.clone(), Arc::new(default_route_policy()))).await
    };
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health_is_unwrapped() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body.get("data").is_none());
}

#[actix_web::test]
async fn test_register_then_duplicate() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "A@x.com", "password": "correct" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
    assert_eq!(body["data"]["user"]["role"], "USER");
    assert!(body["data"]["accessToken"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "a@x.com", "password": "another" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "EMAIL_TAKEN");
    assert_eq!(body["statusCode"], 409);
}

#[actix_web::test]
async fn test_register_validation() {
    let state = test_state();
    let app = init_app!(state);

    for payload in [
        json!({ "email": "not-an-email", "password": "correct" }),
        json!({ "email": "a@x.com", "password": "abc" }),
        json!({ "email": "a@x.com" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{payload}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let state = test_state();
    state.auth_service.register("a@x.com", "correct").await.unwrap();
    let app = init_app!(state);

    let mut messages = Vec::new();
    for payload in [
        json!({ "email": "a@x.com", "password": "wrong-password" }),
        json!({ "email": "nobody@x.com", "password": "correct" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_CREDENTIALS");
        messages.push(body["message"].clone());
    }
    assert_eq!(messages[0], messages[1]);
}

#[actix_web::test]
async fn test_user_login_is_forbidden_on_users() {
    let state = test_state();
    state.auth_service.register("a@x.com", "correct").await.unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "correct" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["role"], "USER");
    let access = body["data"]["accessToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/users")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["statusCode"], 403);
}

#[actix_web::test]
async fn test_encoded_user_paths_keep_admin_requirement() {
    let state = test_state();
    let member = state.auth_service.register("a@x.com", "correct").await.unwrap();
    let admin = state.auth_service.register("root@x.com", "correct").await.unwrap();
    state
        .auth_service
        .set_role(admin.user.id, Role::Admin)
        .await
        .unwrap();
    let admin_tokens = state
        .token_service
        .issue_at(admin.user.id, Role::Admin, Utc::now())
        .unwrap();
    let app = init_app!(state);

    let paths = [
        "/%75sers".to_string(),
        format!("/%75sers/{}", member.user.id),
        format!("/user%73/{}", member.user.id),
        format!("/users/%7B{}", Uuid::nil()),
    ];

    for path in &paths {
        let req = test::TestRequest::get()
            .uri(path)
            .insert_header(bearer(&member.tokens.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{path}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "FORBIDDEN", "{path}");
    }

    // the encoded forms do reach the user handlers
    let req = test::TestRequest::get()
        .uri("/%75sers")
        .insert_header(bearer(&admin_tokens.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/%75sers/{}", member.user.id))
        .insert_header(bearer(&admin_tokens.access_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "a@x.com");
}

#[actix_web::test]
async fn test_promotion_applies_after_refresh() {
    let state = test_state();
    let outcome = state.auth_service.register("a@x.com", "correct").await.unwrap();
    let app = init_app!(state);

    state
        .auth_service
        .set_role(outcome.user.id, Role::Admin)
        .await
        .unwrap();

    // The old token still carries USER
    let req = test::TestRequest::get()
        .uri("/users")
        .insert_header(bearer(&outcome.tokens.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // /auth/me reports the stored role
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&outcome.tokens.access_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["role"], "ADMIN");
    assert_eq!(body["message"], "User retrieved successfully");

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refreshToken": outcome.tokens.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token refreshed successfully");
    assert!(body["data"].get("user").is_none());
    let access = body["data"]["accessToken"].as_str().unwrap().to_string();
    assert_ne!(access, outcome.tokens.access_token);

    let req = test::TestRequest::get()
        .uri("/users")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Users retrieved successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_admin_user_lookup() {
    let state = test_state();
    let admin = state.auth_service.register("root@x.com", "correct").await.unwrap();
    let member = state.auth_service.register("b@x.com", "correct").await.unwrap();
    state
        .auth_service
        .set_role(admin.user.id, Role::Admin)
        .await
        .unwrap();
    let tokens = state
        .token_service
        .issue_at(admin.user.id, Role::Admin, Utc::now())
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}", member.user.id))
        .insert_header(bearer(&tokens.access_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "b@x.com");

    for missing in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let req = test::TestRequest::get()
            .uri(&format!("/users/{missing}"))
            .insert_header(bearer(&tokens.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{missing}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }
}

#[actix_web::test]
async fn test_guard_rejections_on_me() {
    let state = test_state();
    let outcome = state.auth_service.register("a@x.com", "correct").await.unwrap();
    let expired = state
        .token_service
        .issue_at(outcome.user.id, Role::User, Utc::now() - Duration::hours(1))
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "MISSING_TOKEN");

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&expired.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_EXPIRED");

    // The expired pair's refresh token is still valid
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refreshToken": expired.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_failures() {
    let state = test_state();
    let outcome = state.auth_service.register("a@x.com", "correct").await.unwrap();
    let stale = state
        .token_service
        .issue_at(outcome.user.id, Role::User, Utc::now() - Duration::days(8))
        .unwrap();
    let app = init_app!(state);

    for token in [
        stale.refresh_token.clone(),
        outcome.tokens.access_token.clone(),
        "garbage".to_string(),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .set_json(json!({ "refreshToken": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "REFRESH_FAILED");
    }
}

#[actix_web::test]
async fn test_unknown_route_uses_error_body() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["statusCode"], 404);
}
