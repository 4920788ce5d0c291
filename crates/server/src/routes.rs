pub mod auth;
pub mod ratings;
pub mod stores;
pub mod users;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, authenticated and admin routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    // GET for any user, POST for admins only; other methods answer 405
    let store_routes = get(stores::list_stores)
        .merge(post(stores::create_store).route_layer(middleware::from_fn(auth::require_admin)))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    // Any authenticated user
    let user = Router::new()
        .route("/api/ratings", post(ratings::submit_rating))
        .route("/api/my-store", get(stores::my_store))
        .route("/api/users/update-password", post(users::update_password))
        .route("/api/users/change-password", put(users::change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    // System administrators; the admin check runs inside the token check
    let admin = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/add", post(users::add_user))
        .route("/api/stats", get(users::stats))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    public
        .route("/api/stores", store_routes)
        .merge(user)
        .merge(admin)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
