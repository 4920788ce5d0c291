//! In-memory repository implementing every repository trait.
//!
//! Backs unit tests and the router tests in the server crate so neither needs
//! a database. Uniqueness rules mirror the real indexes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use models::user::UserRole;
use models::{rating, store};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::admin::domain::{PlatformStats, UserSummary};
use crate::admin::repository::AdminRepository;
use crate::auth::domain::{AuthUser, NewUser, StoredUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;
use crate::rating::repository::RatingRepository;
use crate::store::domain::{CreateStoreInput, StoreRatingEntry};
use crate::store::repository::StoreRepository;

fn new_store(name: &str, email: &str, address: &str) -> store::Model {
    store::Model {
        id: Uuid::new_v4(),
        name: name.into(),
        email: email.into(),
        address: address.into(),
        overall_rating: Decimal::new(0, 2),
        created_at: Utc::now().into(),
    }
}

#[derive(Default)]
struct MockState {
    users: Vec<StoredUser>,
    stores: Vec<store::Model>,
    ratings: Vec<rating::Model>,
    fail_aggregate: bool,
}

#[derive(Default)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a Normal User without hashing; it cannot log in.
    pub fn seed_user(&self, name: &str, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state().users.push(StoredUser {
            user: AuthUser { id, name: name.into(), email: email.into(), address: None, role: UserRole::NormalUser },
            password_hash: String::new(),
        });
        id
    }

    pub fn seed_store(&self, name: &str, email: &str, address: &str) -> store::Model {
        let s = new_store(name, email, address);
        self.state().stores.push(s.clone());
        s
    }

    /// Upsert a rating row directly; the aggregate is left alone.
    pub fn put_rating(&self, user_id: Uuid, store_id: Uuid, value: i32) -> rating::Model {
        let mut st = self.state();
        if let Some(existing) = st.ratings.iter_mut().find(|r| r.user_id == user_id && r.store_id == store_id) {
            existing.rating = value;
            return existing.clone();
        }
        let row = rating::Model {
            id: Uuid::new_v4(),
            user_id,
            store_id,
            rating: value,
            created_at: Utc::now().into(),
        };
        st.ratings.push(row.clone());
        row
    }

    pub fn store(&self, id: Uuid) -> Option<store::Model> {
        self.state().stores.iter().find(|s| s.id == id).cloned()
    }

    pub fn rating_rows(&self) -> Vec<rating::Model> {
        self.state().ratings.clone()
    }

    /// Make `set_overall_rating` fail until switched off.
    pub fn fail_aggregate_writes(&self, fail: bool) {
        self.state().fail_aggregate = fail;
    }
}

#[async_trait]
impl AuthRepository for MockRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError> {
        Ok(self.state().users.iter().find(|u| u.user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>, AuthError> {
        Ok(self.state().users.iter().find(|u| u.user.id == id).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<AuthUser, AuthError> {
        let mut st = self.state();
        if st.users.iter().any(|u| u.user.email == new_user.email) {
            return Err(AuthError::Conflict("Email already exists.".into()));
        }
        let user = AuthUser {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            address: new_user.address,
            role: new_user.role,
        };
        st.users.push(StoredUser { user: user.clone(), password_hash: new_user.password_hash });
        Ok(user)
    }

    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<(), AuthError> {
        let mut st = self.state();
        let u = st
            .users
            .iter_mut()
            .find(|u| u.user.id == user_id)
            .ok_or_else(|| AuthError::NotFound("User not found.".into()))?;
        u.password_hash = password_hash;
        Ok(())
    }
}

#[async_trait]
impl StoreRepository for MockRepository {
    async fn create_store(&self, input: &CreateStoreInput) -> Result<store::Model, ServiceError> {
        let mut st = self.state();
        if st.stores.iter().any(|s| s.email == input.email) {
            return Err(ServiceError::Conflict("A store with this email already exists.".into()));
        }
        let s = new_store(&input.name, &input.email, &input.address);
        st.stores.push(s.clone());
        Ok(s)
    }

    async fn list_stores(&self) -> Result<Vec<store::Model>, ServiceError> {
        let mut stores = self.state().stores.clone();
        stores.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stores)
    }

    async fn find_store_by_email(&self, email: &str) -> Result<Option<store::Model>, ServiceError> {
        Ok(self.state().stores.iter().find(|s| s.email == email).cloned())
    }

    async fn ratings_by_user(&self, user_id: Uuid) -> Result<Vec<rating::Model>, ServiceError> {
        Ok(self.state().ratings.iter().filter(|r| r.user_id == user_id).cloned().collect())
    }

    async fn ratings_with_authors(&self, store_id: Uuid) -> Result<Vec<StoreRatingEntry>, ServiceError> {
        let st = self.state();
        let mut entries: Vec<StoreRatingEntry> = st
            .ratings
            .iter()
            .rev()
            .filter(|r| r.store_id == store_id)
            .filter_map(|r| {
                let author = st.users.iter().find(|u| u.user.id == r.user_id)?;
                Some(StoreRatingEntry { rating: r.rating, created_at: r.created_at, user_name: author.user.name.clone() })
            })
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

#[async_trait]
impl RatingRepository for MockRepository {
    async fn store_exists(&self, store_id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.store(store_id).is_some())
    }

    async fn upsert_rating(&self, user_id: Uuid, store_id: Uuid, value: i32) -> Result<rating::Model, ServiceError> {
        if !rating::is_valid_value(value) {
            return Err(ServiceError::Validation("rating out of range".into()));
        }
        Ok(self.put_rating(user_id, store_id, value))
    }

    async fn average_rating(&self, store_id: Uuid) -> Result<Option<Decimal>, ServiceError> {
        let st = self.state();
        let values: Vec<i32> = st.ratings.iter().filter(|r| r.store_id == store_id).map(|r| r.rating).collect();
        if values.is_empty() {
            return Ok(None);
        }
        let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
        Ok(Some(Decimal::from(sum) / Decimal::from(values.len() as i64)))
    }

    async fn set_overall_rating(&self, store_id: Uuid, value: Decimal) -> Result<(), ServiceError> {
        let mut st = self.state();
        if st.fail_aggregate {
            return Err(ServiceError::Db("simulated aggregate failure".into()));
        }
        let s = st
            .stores
            .iter_mut()
            .find(|s| s.id == store_id)
            .ok_or_else(|| ServiceError::NotFound("Store not found.".into()))?;
        s.overall_rating = value;
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for MockRepository {
    async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        let mut users: Vec<UserSummary> = self
            .state()
            .users
            .iter()
            .map(|u| UserSummary {
                id: u.user.id,
                name: u.user.name.clone(),
                email: u.user.email.clone(),
                address: u.user.address.clone(),
                role: u.user.role,
            })
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn stats(&self) -> Result<PlatformStats, ServiceError> {
        let st = self.state();
        Ok(PlatformStats {
            total_users: st.users.len() as u64,
            total_stores: st.stores.len() as u64,
            total_ratings: st.ratings.len() as u64,
        })
    }
}
