use models::user::{self, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: UserRole,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, name: m.name, email: m.email, address: m.address, role: m.role }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}
