use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use common::types::MessageBody;
use serde::Serialize;

use service::admin::domain::{PlatformStats, UserSummary};
use service::auth::domain::{AuthUser, ChangePasswordInput, CreateUserInput, NewPasswordRule, SessionClaims};
use service::auth::errors::AuthError;

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct AddUserOutput {
    pub message: &'static str,
    pub user: AuthUser,
}

#[utoipa::path(post, path = "/api/users/update-password", tag = "users", security(("bearer" = [])), request_body = crate::openapi::PasswordChangeRequest, responses((status = 200, description = "Password updated", body = crate::openapi::MessageDoc), (status = 400, description = "New password fails policy", body = crate::openapi::MessageDoc), (status = 401, description = "Incorrect current password", body = crate::openapi::MessageDoc)))]
pub async fn update_password(
    State(state): State<ServerState>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<ChangePasswordInput>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let Json(input) = payload?;
    match state.auth.change_password(claims.id, input, NewPasswordRule::Enforce).await {
        Ok(()) => Ok(Json(MessageBody::new("Password updated successfully!"))),
        Err(AuthError::IncorrectPassword) => Err(ApiError::Unauthorized("Incorrect current password.".into())),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(put, path = "/api/users/change-password", tag = "users", security(("bearer" = [])), request_body = crate::openapi::PasswordChangeRequest, responses((status = 200, description = "Password changed", body = crate::openapi::MessageDoc), (status = 400, description = "Missing field or incorrect current password", body = crate::openapi::MessageDoc)))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<ChangePasswordInput>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let Json(input) = payload?;
    match state.auth.change_password(claims.id, input, NewPasswordRule::RequirePresent).await {
        Ok(()) => Ok(Json(MessageBody::new("Password changed successfully!"))),
        Err(AuthError::IncorrectPassword) => Err(ApiError::BadRequest("Incorrect current password".into())),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(post, path = "/api/users/add", tag = "admin", security(("bearer" = [])), request_body = crate::openapi::AddUserRequest, responses((status = 201, description = "User added", body = crate::openapi::UserEnvelopeDoc), (status = 400, description = "Validation failed or email taken", body = crate::openapi::MessageDoc), (status = 403, description = "Not an administrator", body = crate::openapi::MessageDoc)))]
pub async fn add_user(
    State(state): State<ServerState>,
    payload: Result<Json<CreateUserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AddUserOutput>), ApiError> {
    let Json(input) = payload?;
    let user = state.auth.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(AddUserOutput { message: "User added successfully!", user })))
}

#[utoipa::path(get, path = "/api/users", tag = "admin", security(("bearer" = [])), responses((status = 200, description = "All users, name ascending", body = [crate::openapi::UserDoc]), (status = 403, description = "Not an administrator", body = crate::openapi::MessageDoc)))]
pub async fn list_users(State(state): State<ServerState>) -> Result<Json<Vec<UserSummary>>, ApiError> {
    Ok(Json(state.admin.list_users().await?))
}

#[utoipa::path(get, path = "/api/stats", tag = "admin", security(("bearer" = [])), responses((status = 200, description = "Platform counters", body = crate::openapi::StatsDoc), (status = 403, description = "Not an administrator", body = crate::openapi::MessageDoc)))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<PlatformStats>, ApiError> {
    Ok(Json(state.admin.stats().await?))
}
