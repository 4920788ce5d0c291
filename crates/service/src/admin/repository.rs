use async_trait::async_trait;

use super::domain::{PlatformStats, UserSummary};
use crate::errors::ServiceError;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Name ascending.
    async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError>;
    async fn stats(&self) -> Result<PlatformStats, ServiceError>;
}
