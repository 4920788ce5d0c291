use chrono::{DateTime, FixedOffset};
use models::store;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStoreInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// A store as seen by one user, with that user's own rating if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreListing {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub overall_rating: Decimal,
    pub user_submitted_rating: Option<i32>,
}

impl StoreListing {
    pub fn new(store: store::Model, user_submitted_rating: Option<i32>) -> Self {
        Self {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            overall_rating: store.overall_rating,
            user_submitted_rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRatingEntry {
    pub rating: i32,
    pub created_at: DateTime<FixedOffset>,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    pub store_details: store::Model,
    pub ratings: Vec<StoreRatingEntry>,
}
