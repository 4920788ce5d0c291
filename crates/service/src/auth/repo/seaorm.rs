use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, NewUser, StoredUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email).await?;
        Ok(res.map(StoredUser::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>, AuthError> {
        let res = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(StoredUser::from))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<AuthUser, AuthError> {
        let created = models::user::create(
            &self.db,
            &new_user.name,
            &new_user.email,
            new_user.password_hash,
            new_user.address.as_deref(),
            new_user.role,
        )
        .await?;
        Ok(created.into())
    }

    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<(), AuthError> {
        models::user::update_password_hash(&self.db, user_id, password_hash).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, unique_email};
    use models::user::UserRole;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Database Backed Test User".into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$placeholder".into(),
            address: None,
            role: UserRole::StoreOwner,
        }
    }

    #[tokio::test]
    async fn create_find_and_conflict() {
        let Some(db) = get_db().await else { return };
        let repo = SeaOrmAuthRepository { db };
        let email = unique_email("auth");

        let created = repo.create_user(new_user(&email)).await.unwrap();
        assert_eq!(created.role, UserRole::StoreOwner);

        let by_email = repo.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(by_email.user.id, created.id);
        assert!(repo.find_user_by_id(created.id).await.unwrap().is_some());

        let dup = repo.create_user(new_user(&email)).await;
        assert!(matches!(dup, Err(AuthError::Conflict(_))));

        repo.update_password(created.id, "$argon2id$v=19$other".into()).await.unwrap();
        let reloaded = repo.find_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "$argon2id$v=19$other");
    }
}
