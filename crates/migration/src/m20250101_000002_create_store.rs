//! Create `store` table.
//!
//! Stores are ordered per category; deleting a category that still has stores is refused.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Store::Table)
                    .if_not_exists()
                    .col(uuid(Store::Id).primary_key())
                    .col(uuid(Store::CategoryId).not_null())
                    .col(string_len(Store::Name, 191).not_null())
                    .col(string_len(Store::Slug, 191).unique_key().not_null())
                    .col(text(Store::Description).not_null())
                    .col(text(Store::Address).not_null())
                    .col(ColumnDef::new(Store::Phone).string_len(64).null())
                    .col(boolean(Store::IsActive).not_null())
                    .col(integer(Store::OrderNumber).not_null())
                    .col(timestamp_with_time_zone(Store::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Store::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_store_category")
                            .from(Store::Table, Store::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Store::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Store {
    Table,
    Id,
    CategoryId,
    Name,
    Slug,
    Description,
    Address,
    Phone,
    IsActive,
    OrderNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
