#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use application::auth::use_cases::decode_token;
use common::{TestContext, PASSWORD};
use serde_json::json;

#[actix_web::test]
async fn test_health_check_needs_no_token() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn test_login_issues_token_with_staff_flag() {
    let ctx = TestContext::new();
    let user = ctx.user_with_password("adaeze").await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": "adaeze", "password": PASSWORD }))
        .to_request();
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user.id.to_string());
    assert_eq!(body["username"], "adaeze");

    let claims = decode_token(&ctx.config.jwt_secret, body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert!(!claims.is_staff);
}

#[actix_web::test]
async fn test_login_failures() {
    let ctx = TestContext::new();
    ctx.user_with_password("adaeze").await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": "adaeze", "password": "wrong password" }))
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");
    assert_eq!(body["error_code"], "AUTHENTICATION_FAILED");

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": "adaeze" }))
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Please provide both username and password");
}

#[actix_web::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/properties/").to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Authentication credentials were not provided.");

    let req = test::TestRequest::get()
        .uri("/properties")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid or expired token");
}

#[actix_web::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let ctx = TestContext::new();
    let user = ctx.user("adaeze").await;
    let app = init_app!(ctx);

    let mut foreign = ctx.config.auth_config();
    foreign.jwt_secret = "another-secret".to_string();
    let token = application::auth::use_cases::issue_token(&foreign, user.id, false).unwrap();

    let req = test::TestRequest::get()
        .uri("/documents")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_rate_limit_returns_retry_hint() {
    let app = test::init_service(
        actix_web::App::new()
            .wrap(api::middleware::rate_limit::CallerRateLimitMiddleware::new(1))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error_code"], "RATE_LIMITED");
    assert_eq!(body["retry_after_seconds"], 60);
}

#[actix_web::test]
async fn test_rate_limit_budget_follows_the_caller() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let app = test::init_service(
        actix_web::App::new()
            .wrap(api::middleware::rate_limit::CallerRateLimitMiddleware::new(1))
            .wrap(api::middleware::auth::AuthMiddleware)
            .app_data(ctx.config.clone())
            .configure(api::configure),
    )
    .await;

    let health = |header: Option<(&'static str, String)>| {
        let mut req = test::TestRequest::get().uri("/health");
        if let Some(header) = header {
            req = req.insert_header(header);
        }
        req.to_request()
    };

    let (status, _) = send!(app, health(Some(ctx.bearer(&alice))));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send!(app, health(Some(ctx.bearer(&alice))));
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Same address, different callers: separate budgets.
    let (status, _) = send!(app, health(Some(ctx.bearer(&bob))));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send!(app, health(None));
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send!(app, health(None));
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error_code"], "RATE_LIMITED");
}
