//! Create `site_contact` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteContact::Table)
                    .if_not_exists()
                    .col(uuid(SiteContact::Id).primary_key())
                    .col(string_len(SiteContact::StoreName, 191).not_null())
                    .col(string_len(SiteContact::Phone, 64).not_null())
                    .col(string_len(SiteContact::Email, 191).not_null())
                    .col(text(SiteContact::Address).not_null())
                    .col(boolean(SiteContact::IsActive).not_null())
                    .col(integer(SiteContact::OrderNumber).not_null())
                    .col(timestamp_with_time_zone(SiteContact::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(SiteContact::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SiteContact::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SiteContact { Table, Id, StoreName, Phone, Email, Address, IsActive, OrderNumber, CreatedAt, UpdatedAt }
