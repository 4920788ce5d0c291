use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use service::auth::domain::RegisterInput;
use service::auth::{token, AuthConfig};
use service::mock::MockRepository;

use server::routes::{self, auth::ServerState};

const PASSWORD: &str = "Passw0rd!";

fn app() -> (Router, ServerState) {
    let state = ServerState::from_repository(Arc::new(MockRepository::default()), AuthConfig::new("test-secret"));
    (routes::build_router(state.clone(), CorsLayer::very_permissive()), state)
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str) -> (StatusCode, Value) {
    call(app, "POST", "/api/auth/register", None, Some(json!({
        "name": name, "email": email, "password": PASSWORD, "address": "7 Long Road"
    })))
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(app, "POST", "/api/auth/login", None, Some(json!({"email": email, "password": password}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Login successful!");
    body["token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router, state: &ServerState) -> String {
    state
        .auth
        .ensure_admin(RegisterInput {
            name: "Platform Administrator One".into(),
            email: "admin@platform.com".into(),
            password: PASSWORD.into(),
            address: None,
        })
        .await
        .unwrap();
    login(app, "admin@platform.com", PASSWORD).await
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn register_validates_and_hides_hash() {
    let (app, _) = app();
    let (status, body) = register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully!");
    assert_eq!(body["user"]["role"], "Normal User");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists.");

    let (status, body) = register(&app, "Too Short", "short@b.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name must be between 20 and 60 characters.");

    let (status, body) = call(&app, "POST", "/api/auth/register", None, Some(json!({
        "name": "Alexandra Catherine Smith", "email": "weak@b.com", "password": "Passw0rd"
    })))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be 8-16 characters long, with one uppercase letter and one special character.");
}

#[tokio::test]
async fn login_failures_are_401() {
    let (app, _) = app();
    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;

    let (status, body) = call(&app, "POST", "/api/auth/login", None, Some(json!({"email": "alex@b.com", "password": "Wrong000!"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials. Incorrect password.");

    let (status, body) = call(&app, "POST", "/api/auth/login", None, Some(json!({"email": "nobody@b.com", "password": PASSWORD}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials. User not found.");
}

#[tokio::test]
async fn token_is_required_and_checked() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/api/stores", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "A token is required for authentication");

    let (status, body) = call(&app, "GET", "/api/stores", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid Token");

    // signed with a different secret
    let (other, _) = {
        let state = ServerState::from_repository(Arc::new(MockRepository::default()), AuthConfig::new("other-secret"));
        (routes::build_router(state.clone(), CorsLayer::very_permissive()), state)
    };
    register(&other, "Alexandra Catherine Smith", "alex@b.com").await;
    let foreign = login(&other, "alex@b.com", PASSWORD).await;
    let (status, _) = call(&app, "GET", "/api/stores", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_normal_users() {
    let (app, _) = app();
    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let token = login(&app, "alex@b.com", PASSWORD).await;

    for (method, uri) in [("POST", "/api/stores"), ("GET", "/api/users"), ("GET", "/api/stats"), ("POST", "/api/users/add")] {
        let body = if method == "POST" { Some(json!({})) } else { None };
        let (status, resp) = call(&app, method, uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(resp["message"], "Access denied. Admins only.");
    }
}

#[tokio::test]
async fn rejected_store_creation_leaves_catalog_unchanged() {
    let repo = Arc::new(MockRepository::default());
    repo.seed_store("Acme", "acme@shop.com", "1 Main St");
    let state = ServerState::from_repository(repo.clone(), AuthConfig::new("test-secret"));
    let app = routes::build_router(state, CorsLayer::very_permissive());
    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let token = login(&app, "alex@b.com", PASSWORD).await;

    let (status, resp) = call(&app, "POST", "/api/stores", Some(&token), Some(json!({
        "name": "Sneaky Store", "email": "sneaky@shop.com", "address": "9 Side St"
    })))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["message"], "Access denied. Admins only.");

    let (status, body) = call(&app, "GET", "/api/stores", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Acme"]);
}

#[tokio::test]
async fn expired_token_is_rejected_without_side_effects() {
    let repo = Arc::new(MockRepository::default());
    let store = repo.seed_store("Acme", "acme@shop.com", "1 Main St");
    let state = ServerState::from_repository(repo.clone(), AuthConfig::new("test-secret"));
    let app = routes::build_router(state.clone(), CorsLayer::very_permissive());
    let user = state
        .auth
        .register(RegisterInput {
            name: "Alexandra Catherine Smith".into(),
            email: "alex@b.com".into(),
            password: PASSWORD.into(),
            address: None,
        })
        .await
        .unwrap();
    let expired = token::issue(&user, "test-secret", Duration::hours(8), Utc::now() - Duration::hours(9)).unwrap();

    let (status, body) = call(&app, "POST", "/api/ratings", Some(&expired), Some(json!({"storeId": store.id, "rating": 5}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid Token");
    assert!(repo.rating_rows().is_empty());
}

#[tokio::test]
async fn unsupported_method_on_stores_is_405() {
    let (app, state) = app();
    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let user = login(&app, "alex@b.com", PASSWORD).await;
    let admin = admin_token(&app, &state).await;

    for token in [&user, &admin] {
        let (status, _) = call(&app, "PATCH", "/api/stores", Some(token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[tokio::test]
async fn rate_twice_then_list() {
    let (app, state) = app();
    let admin = admin_token(&app, &state).await;

    let (status, body) = call(&app, "POST", "/api/stores", Some(&admin), Some(json!({
        "name": "Acme", "email": "acme@shop.com", "address": "1 Main St"
    })))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Store added successfully!");
    assert_eq!(body["store"]["overall_rating"], "0.00");
    let store_id = body["store"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "POST", "/api/stores", Some(&admin), Some(json!({
        "name": "Acme Again", "email": "acme@shop.com", "address": "2 Main St"
    })))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A store with this email already exists.");

    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let user = login(&app, "alex@b.com", PASSWORD).await;

    for value in [4, 2] {
        let (status, body) = call(&app, "POST", "/api/ratings", Some(&user), Some(json!({"storeId": store_id, "rating": value}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Rating submitted successfully!");
        assert_eq!(body["rating"]["rating"], value);
    }

    let (status, body) = call(&app, "GET", "/api/stores", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let acme = &body.as_array().unwrap()[0];
    assert_eq!(acme["name"], "Acme");
    assert_eq!(acme["overall_rating"], "2.00");
    assert_eq!(acme["user_submitted_rating"], 2);

    let (_, stats) = call(&app, "GET", "/api/stats", Some(&admin), None).await;
    assert_eq!(stats, json!({"totalUsers": 2, "totalStores": 1, "totalRatings": 1}));

    let (_, users) = call(&app, "GET", "/api/users", Some(&admin), None).await;
    let names: Vec<&str> = users.as_array().unwrap().iter().map(|u| u["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Alexandra Catherine Smith", "Platform Administrator One"]);
}

#[tokio::test]
async fn rating_input_errors() {
    let (app, _) = app();
    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let user = login(&app, "alex@b.com", PASSWORD).await;
    let rule = "Store ID and a rating between 1 and 5 are required.";

    let (status, body) = call(&app, "POST", "/api/ratings", Some(&user), Some(json!({"rating": 3}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], rule);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = call(&app, "POST", "/api/ratings", Some(&user), Some(json!({"storeId": missing, "rating": 9}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], rule);

    let (status, _) = call(&app, "POST", "/api/ratings", Some(&user), Some(json!({"storeId": missing, "rating": 3}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, "POST", "/api/ratings", Some(&user), Some(json!({"storeId": "nope", "rating": 3}))).await;
    assert!(status.is_client_error());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn owner_dashboard() {
    let (app, state) = app();
    let admin = admin_token(&app, &state).await;

    let (status, _) = call(&app, "POST", "/api/users/add", Some(&admin), Some(json!({
        "name": "Olivia Store Owner Person", "email": "owner@shop.com", "password": PASSWORD, "role": "Store Owner"
    })))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let owner = login(&app, "owner@shop.com", PASSWORD).await;

    let (status, body) = call(&app, "GET", "/api/my-store", Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No store is registered with your email address.");

    let (_, created) = call(&app, "POST", "/api/stores", Some(&admin), Some(json!({
        "name": "Owner Shop", "email": "owner@shop.com", "address": "5 Side St"
    })))
    .await;
    let store_id = created["store"]["id"].clone();

    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let user = login(&app, "alex@b.com", PASSWORD).await;
    call(&app, "POST", "/api/ratings", Some(&user), Some(json!({"storeId": store_id, "rating": 5}))).await;

    let (status, body) = call(&app, "GET", "/api/my-store", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. Store Owners only.");

    let (status, body) = call(&app, "GET", "/api/my-store", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storeDetails"]["id"], store_id);
    assert_eq!(body["storeDetails"]["overall_rating"], "5.00");
    assert_eq!(body["ratings"][0]["rating"], 5);
    assert_eq!(body["ratings"][0]["user_name"], "Alexandra Catherine Smith");
}

#[tokio::test]
async fn password_endpoints_differ_in_strictness() {
    let (app, _) = app();
    register(&app, "Alexandra Catherine Smith", "alex@b.com").await;
    let token = login(&app, "alex@b.com", PASSWORD).await;

    let (status, body) = call(&app, "POST", "/api/users/update-password", Some(&token), Some(json!({
        "currentPassword": "Wrong000!", "newPassword": "N3wPass!!"
    })))
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect current password.");

    let (status, body) = call(&app, "PUT", "/api/users/change-password", Some(&token), Some(json!({
        "currentPassword": "Wrong000!", "newPassword": "whatever"
    })))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect current password");

    let (status, body) = call(&app, "PUT", "/api/users/change-password", Some(&token), Some(json!({"currentPassword": PASSWORD}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, body) = call(&app, "POST", "/api/users/update-password", Some(&token), Some(json!({
        "currentPassword": PASSWORD, "newPassword": "N3wPass!!"
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully!");

    // the old token stays valid; the new password is what logs in now
    let (status, body) = call(&app, "PUT", "/api/users/change-password", Some(&token), Some(json!({
        "currentPassword": "N3wPass!!", "newPassword": "lenient"
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully!");
    login(&app, "alex@b.com", "lenient").await;
}

#[tokio::test]
async fn malformed_json_gets_message_body() {
    let (app, _) = app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/ratings").is_some());
}
