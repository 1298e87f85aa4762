use sea_orm::DatabaseConnection;
use migration::MigratorTrait;


/// Unique index classification
pub mod constraint_tests;

/// Connect and migrate, or `None` when no database is available for this run.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match crate::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

/// An order number unlikely to collide with rows left behind by other runs.
pub(crate) fn scratch_order_number() -> i32 {
    (uuid::Uuid::new_v4().as_u128() % 1_000_000_000) as i32 + 1_000_000
}
