use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use models::rating;
use service::auth::domain::SessionClaims;
use service::rating::domain::SubmitRatingInput;

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct SubmitRatingOutput {
    pub message: &'static str,
    pub rating: rating::Model,
}

#[utoipa::path(post, path = "/api/ratings", tag = "ratings", security(("bearer" = [])), request_body = crate::openapi::SubmitRatingRequest, responses((status = 201, description = "Rating stored", body = crate::openapi::RatingEnvelopeDoc), (status = 400, description = "Missing store or rating out of range", body = crate::openapi::MessageDoc), (status = 404, description = "Unknown store", body = crate::openapi::MessageDoc)))]
pub async fn submit_rating(
    State(state): State<ServerState>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<SubmitRatingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitRatingOutput>), ApiError> {
    let Json(input) = payload?;
    let rating = state.ratings.submit_rating(claims.id, input).await?;
    Ok((StatusCode::CREATED, Json(SubmitRatingOutput { message: "Rating submitted successfully!", rating })))
}
