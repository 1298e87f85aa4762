use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Index names are matched against the `*_CONSTRAINT` consts in `models`; keep them in sync.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Category: globally unique order number and normalized name
        manager
            .create_index(
                Index::create()
                    .name("uniq_category_order")
                    .table(Category::Table)
                    .col(Category::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_category_name_key")
                    .table(Category::Table)
                    .col(Category::NameKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Store: composite unique (category_id, order_number)
        manager
            .create_index(
                Index::create()
                    .name("uniq_store_category_order")
                    .table(Store::Table)
                    .col(Store::CategoryId)
                    .col(Store::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_site_contact_order")
                    .table(SiteContact::Table)
                    .col(SiteContact::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // StoreImage: composite unique (store_id, order_number)
        manager
            .create_index(
                Index::create()
                    .name("uniq_store_image_order")
                    .table(StoreImage::Table)
                    .col(StoreImage::StoreId)
                    .col(StoreImage::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_category_order").table(Category::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_category_name_key").table(Category::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_store_category_order").table(Store::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_site_contact_order").table(SiteContact::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_store_image_order").table(StoreImage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Category { Table, OrderNumber, NameKey }

#[derive(DeriveIden)]
enum Store { Table, CategoryId, OrderNumber }

#[derive(DeriveIden)]
enum SiteContact { Table, OrderNumber }

#[derive(DeriveIden)]
enum StoreImage { Table, StoreId, OrderNumber }
