use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use models::{store, user::UserRole};
use service::auth::domain::SessionClaims;
use service::auth::require_role;
use service::store::domain::{CreateStoreInput, OwnerDashboard, StoreListing};

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct CreateStoreOutput {
    pub message: &'static str,
    pub store: store::Model,
}

#[utoipa::path(get, path = "/api/stores", tag = "stores", security(("bearer" = [])), responses((status = 200, description = "Stores with the caller's own rating", body = [crate::openapi::StoreListingDoc]), (status = 401, description = "Invalid token", body = crate::openapi::MessageDoc)))]
pub async fn list_stores(
    State(state): State<ServerState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<StoreListing>>, ApiError> {
    Ok(Json(state.stores.list_for_user(claims.id).await?))
}

#[utoipa::path(post, path = "/api/stores", tag = "admin", security(("bearer" = [])), request_body = crate::openapi::CreateStoreRequest, responses((status = 201, description = "Store added", body = crate::openapi::StoreEnvelopeDoc), (status = 400, description = "Validation failed or email taken", body = crate::openapi::MessageDoc), (status = 403, description = "Not an administrator", body = crate::openapi::MessageDoc)))]
pub async fn create_store(
    State(state): State<ServerState>,
    payload: Result<Json<CreateStoreInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateStoreOutput>), ApiError> {
    let Json(input) = payload?;
    let store = state.stores.create_store(input).await?;
    Ok((StatusCode::CREATED, Json(CreateStoreOutput { message: "Store added successfully!", store })))
}

#[utoipa::path(get, path = "/api/my-store", tag = "stores", security(("bearer" = [])), responses((status = 200, description = "Owner dashboard", body = crate::openapi::OwnerDashboardDoc), (status = 403, description = "Not a store owner", body = crate::openapi::MessageDoc), (status = 404, description = "No store under the owner's email", body = crate::openapi::MessageDoc)))]
pub async fn my_store(
    State(state): State<ServerState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<OwnerDashboard>, ApiError> {
    require_role(&claims, UserRole::StoreOwner)?;
    Ok(Json(state.stores.owner_dashboard(&claims.email).await?))
}
