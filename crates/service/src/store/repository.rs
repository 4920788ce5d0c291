use async_trait::async_trait;
use models::{rating, store};
use uuid::Uuid;

use super::domain::{CreateStoreInput, StoreRatingEntry};
use crate::errors::ServiceError;

#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Duplicate store email is `ServiceError::Conflict`.
    async fn create_store(&self, input: &CreateStoreInput) -> Result<store::Model, ServiceError>;
    /// All stores, name ascending.
    async fn list_stores(&self) -> Result<Vec<store::Model>, ServiceError>;
    async fn find_store_by_email(&self, email: &str) -> Result<Option<store::Model>, ServiceError>;
    async fn ratings_by_user(&self, user_id: Uuid) -> Result<Vec<rating::Model>, ServiceError>;
    /// Newest first.
    async fn ratings_with_authors(&self, store_id: Uuid) -> Result<Vec<StoreRatingEntry>, ServiceError>;
}
