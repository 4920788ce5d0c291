use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{rating, user};

pub const REQUIRED_FIELDS_RULE: &str = "Name, email, and address are required.";
pub const NAME_MAX_CHARS: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
    /// Mean of all ratings, two decimals; only the aggregator writes it.
    #[sea_orm(column_type = "Decimal(Some((3, 2)))")]
    pub overall_rating: Decimal,
    pub created_at: DateTimeWithTimeZone,
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

pub fn validate_new(name: &str, email: &str, address: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() || email.trim().is_empty() || address.trim().is_empty() {
        return Err(ModelError::Validation(REQUIRED_FIELDS_RULE.into()));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ModelError::Validation("Store name must not exceed 255 characters.".into()));
    }
    user::validate_email(email)?;
    user::validate_address(Some(address))?;
    Ok(())
}

pub async fn create(db: &DatabaseConnection, name: &str, email: &str, address: &str) -> Result<Model, ModelError> {
    validate_new(name, email, address)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        address: Set(address.to_string()),
        overall_rating: Set(Decimal::new(0, 2)),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db)
        .await
        .map_err(|e| ModelError::from_write(e, "A store with this email already exists."))
}

pub async fn exists(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?.is_some())
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find().filter(Column::Email.eq(email)).one(db).await?;
    Ok(found)
}

pub async fn list_ordered_by_name(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    let stores = Entity::find().order_by_asc(Column::Name).all(db).await?;
    Ok(stores)
}

pub async fn set_overall_rating(db: &DatabaseConnection, id: Uuid, value: Decimal) -> Result<(), ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::OverallRating, Expr::value(value))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ModelError::NotFound("Store not found.".into()));
    }
    Ok(())
}
