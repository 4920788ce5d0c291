use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, NewUser, StoredUser};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
///
/// `create_user` must report a duplicate email as `AuthError::Conflict`; the
/// unique index, not a prior lookup, is what guarantees it.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>, AuthError>;
    async fn create_user(&self, new_user: NewUser) -> Result<AuthUser, AuthError>;
    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<(), AuthError>;
}
