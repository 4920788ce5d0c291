use models::{rating, store};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::store::domain::{CreateStoreInput, StoreRatingEntry};
use crate::store::repository::StoreRepository;

pub struct SeaOrmStoreRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl StoreRepository for SeaOrmStoreRepository {
    async fn create_store(&self, input: &CreateStoreInput) -> Result<store::Model, ServiceError> {
        Ok(store::create(&self.db, &input.name, &input.email, &input.address).await?)
    }

    async fn list_stores(&self) -> Result<Vec<store::Model>, ServiceError> {
        Ok(store::list_ordered_by_name(&self.db).await?)
    }

    async fn find_store_by_email(&self, email: &str) -> Result<Option<store::Model>, ServiceError> {
        Ok(store::find_by_email(&self.db, email).await?)
    }

    async fn ratings_by_user(&self, user_id: Uuid) -> Result<Vec<rating::Model>, ServiceError> {
        Ok(rating::by_user(&self.db, user_id).await?)
    }

    async fn ratings_with_authors(&self, store_id: Uuid) -> Result<Vec<StoreRatingEntry>, ServiceError> {
        let rows = rating::for_store_with_authors(&self.db, store_id).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(r, author)| {
                author.map(|u| StoreRatingEntry { rating: r.rating, created_at: r.created_at, user_name: u.name })
            })
            .collect())
    }
}
