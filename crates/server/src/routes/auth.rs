use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::warn;

use models::user::UserRole;
use service::admin::{repo::seaorm::SeaOrmAdminRepository, repository::AdminRepository, AdminService};
use service::auth::domain::{AuthUser, LoginInput, RegisterInput, SessionClaims};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::{require_role, AuthConfig, AuthService};
use service::rating::{repo::seaorm::SeaOrmRatingRepository, repository::RatingRepository, RatingService};
use service::store::{repo::seaorm::SeaOrmStoreRepository, repository::StoreRepository, StoreService};

use crate::errors::ApiError;

/// Shared handler state; every service sits behind a repository trait object.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub stores: Arc<StoreService<dyn StoreRepository>>,
    pub ratings: Arc<RatingService<dyn RatingRepository>>,
    pub admin: Arc<AdminService<dyn AdminRepository>>,
}

impl ServerState {
    pub fn with_database(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let auth_repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db: db.clone() });
        let store_repo: Arc<dyn StoreRepository> = Arc::new(SeaOrmStoreRepository { db: db.clone() });
        let rating_repo: Arc<dyn RatingRepository> = Arc::new(SeaOrmRatingRepository { db: db.clone() });
        let admin_repo: Arc<dyn AdminRepository> = Arc::new(SeaOrmAdminRepository { db });
        Self {
            auth: Arc::new(AuthService::new(auth_repo, auth)),
            stores: Arc::new(StoreService::new(store_repo)),
            ratings: Arc::new(RatingService::new(rating_repo)),
            admin: Arc::new(AdminService::new(admin_repo)),
        }
    }

    /// All services over one repository, e.g. `service::mock::MockRepository`.
    pub fn from_repository<R>(repo: Arc<R>, auth: AuthConfig) -> Self
    where
        R: AuthRepository + StoreRepository + RatingRepository + AdminRepository + 'static,
    {
        let auth_repo: Arc<dyn AuthRepository> = repo.clone();
        let store_repo: Arc<dyn StoreRepository> = repo.clone();
        let rating_repo: Arc<dyn RatingRepository> = repo.clone();
        let admin_repo: Arc<dyn AdminRepository> = repo;
        Self {
            auth: Arc::new(AuthService::new(auth_repo, auth)),
            stores: Arc::new(StoreService::new(store_repo)),
            ratings: Arc::new(RatingService::new(rating_repo)),
            admin: Arc::new(AdminService::new(admin_repo)),
        }
    }
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub message: &'static str,
    pub user: AuthUser,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub message: &'static str,
    pub token: String,
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::UserEnvelopeDoc), (status = 400, description = "Validation failed or email taken", body = crate::openapi::MessageDoc)))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterOutput>), ApiError> {
    let Json(input) = payload?;
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { message: "User registered successfully!", user })))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::LoginResponseDoc), (status = 401, description = "Bad credentials", body = crate::openapi::MessageDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<LoginOutput>, ApiError> {
    let Json(input) = payload?;
    let session = state.auth.login(input).await?;
    Ok(Json(LoginOutput { message: "Login successful!", token: session.token }))
}

/// `Authorization: Bearer <token>`; an absent header or empty token counts as missing.
fn bearer_token(req: &Request) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::TokenMissing)?;
    let mut parts = value.splitn(2, ' ');
    let _scheme = parts.next();
    match parts.next().map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::TokenMissing),
    }
}

/// Verify the session token and attach its claims to the request.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = match bearer_token(&req).and_then(|token| state.auth.verify_token(token)) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(path = %req.uri().path(), code = e.code(), "request not authenticated");
            return Err(e.into());
        }
    };
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Runs after `require_bearer_token`.
pub async fn require_admin(
    Extension(claims): Extension<SessionClaims>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&claims, UserRole::SystemAdministrator)?;
    Ok(next.run(req).await)
}
