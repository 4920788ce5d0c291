use std::collections::HashMap;
use std::sync::Arc;

use models::store;
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{CreateStoreInput, OwnerDashboard, StoreListing};
use super::repository::StoreRepository;
use crate::errors::ServiceError;

pub const NO_OWNED_STORE: &str = "No store is registered with your email address.";

pub struct StoreService<R: StoreRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: StoreRepository + ?Sized> StoreService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_store(&self, input: CreateStoreInput) -> Result<store::Model, ServiceError> {
        store::validate_new(&input.name, &input.email, &input.address)?;
        let created = self.repo.create_store(&input).await?;
        info!(store_id = %created.id, "store_created");
        Ok(created)
    }

    /// Every store, name ascending, annotated with the caller's own rating.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<StoreListing>, ServiceError> {
        let own: HashMap<Uuid, i32> = self
            .repo
            .ratings_by_user(user_id)
            .await?
            .into_iter()
            .map(|r| (r.store_id, r.rating))
            .collect();
        let stores = self.repo.list_stores().await?;
        Ok(stores
            .into_iter()
            .map(|s| {
                let mine = own.get(&s.id).copied();
                StoreListing::new(s, mine)
            })
            .collect())
    }

    /// The owner's store is the one registered under the owner's login email.
    #[instrument(skip(self))]
    pub async fn owner_dashboard(&self, owner_email: &str) -> Result<OwnerDashboard, ServiceError> {
        let store_details = self
            .repo
            .find_store_by_email(owner_email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NO_OWNED_STORE.into()))?;
        let ratings = self.repo.ratings_with_authors(store_details.id).await?;
        Ok(OwnerDashboard { store_details, ratings })
    }
}
