use async_trait::async_trait;
use models::rating;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::ServiceError;

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn store_exists(&self, store_id: Uuid) -> Result<bool, ServiceError>;
    /// Single-statement insert-or-overwrite on (user_id, store_id).
    async fn upsert_rating(&self, user_id: Uuid, store_id: Uuid, value: i32) -> Result<rating::Model, ServiceError>;
    /// Unrounded mean; `None` without ratings.
    async fn average_rating(&self, store_id: Uuid) -> Result<Option<Decimal>, ServiceError>;
    async fn set_overall_rating(&self, store_id: Uuid, value: Decimal) -> Result<(), ServiceError>;
}
