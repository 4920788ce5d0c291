use models::{rating, store, user};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::admin::domain::{PlatformStats, UserSummary};
use crate::admin::repository::AdminRepository;
use crate::errors::ServiceError;

pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[async_trait::async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        let users = user::list_ordered_by_name(&self.db).await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    async fn stats(&self) -> Result<PlatformStats, ServiceError> {
        let (total_users, total_stores, total_ratings) = tokio::try_join!(
            user::Entity::find().count(&self.db),
            store::Entity::find().count(&self.db),
            rating::Entity::find().count(&self.db),
        )
        .map_err(db_err)?;
        Ok(PlatformStats { total_users, total_stores, total_ratings })
    }
}
