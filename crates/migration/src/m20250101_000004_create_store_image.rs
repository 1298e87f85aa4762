//! Create `store_image` table.
//!
//! Gallery images ordered per store; removed together with their store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StoreImage::Table)
                    .if_not_exists()
                    .col(uuid(StoreImage::Id).primary_key())
                    .col(uuid(StoreImage::StoreId).not_null())
                    .col(text(StoreImage::ImageUrl).not_null())
                    .col(ColumnDef::new(StoreImage::AltText).string_len(191).null())
                    .col(integer(StoreImage::OrderNumber).not_null())
                    .col(timestamp_with_time_zone(StoreImage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_store_image_store")
                            .from(StoreImage::Table, StoreImage::StoreId)
                            .to(Store::Table, Store::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StoreImage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StoreImage { Table, Id, StoreId, ImageUrl, AltText, OrderNumber, CreatedAt }

#[derive(DeriveIden)]
enum Store { Table, Id }
