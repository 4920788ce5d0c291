use models::{rating, store};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::rating::repository::RatingRepository;

pub struct SeaOrmRatingRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl RatingRepository for SeaOrmRatingRepository {
    async fn store_exists(&self, store_id: Uuid) -> Result<bool, ServiceError> {
        Ok(store::exists(&self.db, store_id).await?)
    }

    async fn upsert_rating(&self, user_id: Uuid, store_id: Uuid, value: i32) -> Result<rating::Model, ServiceError> {
        Ok(rating::upsert(&self.db, user_id, store_id, value).await?)
    }

    async fn average_rating(&self, store_id: Uuid) -> Result<Option<Decimal>, ServiceError> {
        Ok(rating::average_for_store(&self.db, store_id).await?)
    }

    async fn set_overall_rating(&self, store_id: Uuid, value: Decimal) -> Result<(), ServiceError> {
        Ok(store::set_overall_rating(&self.db, store_id, value).await?)
    }
}
