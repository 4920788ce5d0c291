use std::sync::Arc;

use models::rating;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::domain::SubmitRatingInput;
use super::repository::RatingRepository;
use crate::errors::ServiceError;

pub const RATING_RULE: &str = "Store ID and a rating between 1 and 5 are required.";

/// Two decimals, half away from zero; no ratings means 0.00.
pub fn round_aggregate(mean: Option<Decimal>) -> Decimal {
    let mut v = mean
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(2);
    v
}

pub struct RatingService<R: RatingRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RatingRepository + ?Sized> RatingService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Record or overwrite the caller's rating, then refresh the store aggregate.
    ///
    /// The aggregate refresh is best effort: once the rating row is written the
    /// call succeeds, and a failed refresh is only logged.
    #[instrument(skip(self, input), fields(user_id = %user_id, store_id = ?input.store_id))]
    pub async fn submit_rating(&self, user_id: Uuid, input: SubmitRatingInput) -> Result<rating::Model, ServiceError> {
        let (store_id, value) = match (input.store_id, input.rating) {
            (Some(store_id), Some(value)) if rating::is_valid_value(value) => (store_id, value),
            _ => return Err(ServiceError::Validation(RATING_RULE.into())),
        };
        if !self.repo.store_exists(store_id).await? {
            return Err(ServiceError::NotFound("Store not found.".into()));
        }
        let saved = self.repo.upsert_rating(user_id, store_id, value).await?;
        info!(rating_id = %saved.id, rating = value, "rating_saved");

        if let Err(e) = self.recompute_aggregate(store_id).await {
            error!(store_id = %store_id, error = %e, "aggregate recompute failed");
        }
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn recompute_aggregate(&self, store_id: Uuid) -> Result<Decimal, ServiceError> {
        let overall = round_aggregate(self.repo.average_rating(store_id).await?);
        self.repo.set_overall_rating(store_id, overall).await?;
        info!(overall_rating = %overall, "aggregate_updated");
        Ok(overall)
    }
}
