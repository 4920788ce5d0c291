use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::rating;

pub const NAME_MIN_CHARS: usize = 20;
pub const NAME_MAX_CHARS: usize = 60;
pub const ADDRESS_MAX_CHARS: usize = 400;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 16;
pub const PASSWORD_SPECIALS: &str = "!@#$&*";

pub const NAME_RULE: &str = "Name must be between 20 and 60 characters.";
pub const ADDRESS_RULE: &str = "Address must not exceed 400 characters.";
pub const PASSWORD_RULE: &str =
    "Password must be 8-16 characters long, with one uppercase letter and one special character.";
pub const EMAIL_RULE: &str = "Please enter a valid email address.";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Account role. Stored as its display label so rows stay readable in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum UserRole {
    #[default]
    #[sea_orm(string_value = "Normal User")]
    #[serde(rename = "Normal User")]
    NormalUser,
    #[sea_orm(string_value = "Store Owner")]
    #[serde(rename = "Store Owner")]
    StoreOwner,
    #[sea_orm(string_value = "System Administrator")]
    #[serde(rename = "System Administrator")]
    SystemAdministrator,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::NormalUser => "Normal User",
            UserRole::StoreOwner => "Store Owner",
            UserRole::SystemAdministrator => "System Administrator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Normal User" => Ok(UserRole::NormalUser),
            "Store Owner" => Ok(UserRole::StoreOwner),
            "System Administrator" => Ok(UserRole::SystemAdministrator),
            other => Err(ModelError::Validation(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Ratings,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Ratings => Entity::has_many(rating::Entity).into(),
        }
    }
}

impl Related<rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(ModelError::Validation(NAME_RULE.into()));
    }
    Ok(())
}

pub fn validate_address(address: Option<&str>) -> Result<(), ModelError> {
    match address {
        Some(a) if a.chars().count() > ADDRESS_MAX_CHARS => Err(ModelError::Validation(ADDRESS_RULE.into())),
        _ => Ok(()),
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ModelError::Validation(EMAIL_RULE.into()));
    }
    Ok(())
}

/// 8 to 16 characters, at least one ASCII uppercase letter and one of `!@#$&*`.
pub fn validate_password(password: &str) -> Result<(), ModelError> {
    let len = password.chars().count();
    let ok = (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !ok {
        return Err(ModelError::Validation(PASSWORD_RULE.into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password_hash: String,
    address: Option<&str>,
    role: UserRole,
) -> Result<Model, ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        address: Set(address.map(str::to_string)),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::from_write(e, "Email already exists."))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find().filter(Column::Email.eq(email)).one(db).await?;
    Ok(found)
}

pub async fn update_password_hash(db: &DatabaseConnection, id: Uuid, password_hash: String) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("User not found.".into()))?
        .into();
    am.password_hash = Set(password_hash);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

pub async fn list_ordered_by_name(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    let users = Entity::find().order_by_asc(Column::Name).all(db).await?;
    Ok(users)
}
