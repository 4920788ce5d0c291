use std::sync::Arc;

use tracing::instrument;

use super::domain::{PlatformStats, UserSummary};
use super::repository::AdminRepository;
use crate::errors::ServiceError;

pub struct AdminService<R: AdminRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: AdminRepository + ?Sized> AdminService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        self.repo.list_users().await
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<PlatformStats, ServiceError> {
        self.repo.stats().await
    }
}
