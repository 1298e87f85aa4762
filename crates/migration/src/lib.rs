//! Migrator registering directory tables in dependency order.
//! Ordering indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_category;
mod m20250101_000002_create_store;
mod m20250101_000003_create_site_contact;
mod m20250101_000004_create_store_image;
mod m20250101_000010_add_ordering_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_category::Migration),
            Box::new(m20250101_000002_create_store::Migration),
            Box::new(m20250101_000003_create_site_contact::Migration),
            Box::new(m20250101_000004_create_store_image::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000010_add_ordering_indexes::Migration),
        ]
    }
}
