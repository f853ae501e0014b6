mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::setup;
use store_service::services::AccountService;

#[actix_web::test]
async fn register_then_login() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "alice", "password": "wonderland", "first_name": "Alice"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["first_name"], "Alice");
    assert!(body.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({"username": "alice", "password": "wonderland"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], common::TOKEN_TTL_SECS);
    let token = body["access_token"].as_str().unwrap().to_string();

    // A fresh account can order but cannot manage the catalogue
    let req = test::TestRequest::get()
        .uri("/api/v1/orders")
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .insert_header(common::bearer(&token))
        .set_json(json!({"name": "x", "description": "y", "price": "1.00"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn duplicate_username_conflicts() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;
    let payload = json!({"username": "bob", "password": "builder123"});

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn short_password_is_rejected() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "carol", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn usernames_are_trimmed_on_register_and_login() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "   ", "password": "long enough"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "  erin ", "password": "long enough"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "erin");

    for username in ["erin", "  erin "] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_json(json!({"username": username, "password": "long enough"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "username {:?}", username);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "erin", "password": "long enough"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn wrong_credentials_are_unauthorized() {
    let ctx = setup().await;
    common::create_user(&ctx.pool, "dave", false).await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    for payload in [
        json!({"username": "dave", "password": "not-the-password"}),
        json!({"username": "nobody", "password": "password123"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "payload {}", payload);
    }
}

#[actix_web::test]
async fn staff_accounts_come_from_provisioning() {
    let ctx = setup().await;
    let accounts = AccountService::new(ctx.pool.clone());
    let staff = accounts.create_staff("root", "supersecret").await.unwrap();
    assert!(staff.is_staff);

    // Running it again promotes the same row and resets the password
    let again = accounts.create_staff("root", "differentpw").await.unwrap();
    assert_eq!(again.id, staff.id);

    let app = test::init_service(common::create_app(ctx.state())).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({"username": "root", "password": "differentpw"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .insert_header(common::bearer(&token))
        .set_json(json!({"name": "Staff pick", "description": "Chosen", "price": 12}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["price"], "12.00");
}

#[actix_web::test]
async fn health_endpoints_report_database_state() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "store-service");

    let req = test::TestRequest::get().uri("/api/v1/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["database"]["reachable"], true);
    assert!(body["database"]["latency_ms"].is_u64());

    let req = test::TestRequest::get().uri("/api/v1/health/live").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["alive"], true);
}
