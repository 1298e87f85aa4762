pub mod seaorm;
pub mod tables;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use seaorm::{OrderedTable, SeaOrmOrdinalRepository};
pub use tables::{CategoryTable, ContactTable, StoreImageTable, StoreTable};

use super::service::{OrderingPolicy, OrderingService};

/// Ordering service over the table described by `T`.
pub fn service_for<T: OrderedTable>(db: &DatabaseConnection, policy: &OrderingPolicy) -> OrderingService<SeaOrmOrdinalRepository<T>> {
    OrderingService::new(Arc::new(SeaOrmOrdinalRepository::new(db.clone())), policy.clone())
}
