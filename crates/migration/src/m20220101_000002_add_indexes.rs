use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Rating: one row per (user_id, store_id); also the ON CONFLICT target of the upsert
        manager
            .create_index(
                Index::create()
                    .name("uniq_rating_user_store")
                    .table(Rating::Table)
                    .col(Rating::UserId)
                    .col(Rating::StoreId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Rating: aggregate and owner dashboard scan by store
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_store_created")
                    .table(Rating::Table)
                    .col(Rating::StoreId)
                    .col(Rating::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Store: listing is ordered by name
        manager
            .create_index(
                Index::create()
                    .name("idx_store_name")
                    .table(Store::Table)
                    .col(Store::Name)
                    .to_owned(),
            )
            .await?;

        // User: admin listing is ordered by name
        manager
            .create_index(
                Index::create()
                    .name("idx_user_name")
                    .table(User::Table)
                    .col(User::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_rating_user_store").table(Rating::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_rating_store_created").table(Rating::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_store_name").table(Store::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_name").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rating { Table, UserId, StoreId, CreatedAt }

#[derive(DeriveIden)]
enum Store { Table, Name }

#[derive(DeriveIden)]
enum User { Table, Name }
