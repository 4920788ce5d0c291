use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, Func, OnConflict, SimpleExpr},
    DatabaseConnection, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{store, user};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// One row per (user, store); resubmissions overwrite `rating` in place.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub rating: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Store,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Store => Entity::belongs_to(store::Entity)
                .from(Column::StoreId)
                .to(store::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn is_valid_value(value: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

/// Insert or overwrite the caller's rating for a store in a single statement.
///
/// `INSERT ... ON CONFLICT (user_id, store_id) DO UPDATE SET rating = EXCLUDED.rating`,
/// so concurrent submissions for the same pair resolve to the last writer.
pub async fn upsert(db: &DatabaseConnection, user_id: Uuid, store_id: Uuid, value: i32) -> Result<Model, ModelError> {
    if !is_valid_value(value) {
        return Err(ModelError::Validation(format!("rating must be between {MIN_RATING} and {MAX_RATING}")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        store_id: Set(store_id),
        rating: Set(value),
        created_at: Set(Utc::now().into()),
    };
    let saved = Entity::insert(am)
        .on_conflict(
            OnConflict::columns([Column::UserId, Column::StoreId])
                .update_column(Column::Rating)
                .to_owned(),
        )
        .exec_with_returning(db)
        .await?;
    Ok(saved)
}

/// `AVG(rating)` for a store; `None` when it has no ratings.
pub async fn average_for_store(db: &DatabaseConnection, store_id: Uuid) -> Result<Option<Decimal>, ModelError> {
    let avg: SimpleExpr = Func::avg(Expr::col(Column::Rating)).into();
    let row: Option<Option<Decimal>> = Entity::find()
        .select_only()
        .column_as(avg, "average_rating")
        .filter(Column::StoreId.eq(store_id))
        .into_tuple::<Option<Decimal>>()
        .one(db)
        .await?;
    Ok(row.flatten())
}

pub async fn by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find().filter(Column::UserId.eq(user_id)).all(db).await?;
    Ok(rows)
}

pub async fn by_user_and_store(db: &DatabaseConnection, user_id: Uuid, store_id: Uuid) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::StoreId.eq(store_id))
        .all(db)
        .await?;
    Ok(rows)
}

/// Ratings of one store, newest first, each paired with its author.
pub async fn for_store_with_authors(
    db: &DatabaseConnection,
    store_id: Uuid,
) -> Result<Vec<(Model, Option<user::Model>)>, ModelError> {
    let rows = Entity::find()
        .filter(Column::StoreId.eq(store_id))
        .order_by_desc(Column::CreatedAt)
        .find_also_related(user::Entity)
        .all(db)
        .await?;
    Ok(rows)
}
