#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

use crate::ordering::OrderingPolicy;

// Migrations run once per test process; `false` means no usable database.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// A migrated connection, or `None` when `SKIP_DB_TESTS` is set or no database is reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let ready = *MIGRATED
        .get_or_init(|| async {
            let db = match models::db::connect().await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            match migration::Migrator::up(&db, None).await {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("skip: migrate up failed: {}", e);
                    false
                }
            }
        })
        .await;
    if !ready {
        return None;
    }
    // Fresh connection bound to the current test's runtime
    models::db::connect().await.ok()
}

pub fn policy() -> OrderingPolicy {
    OrderingPolicy::default()
}

/// An order number unlikely to collide with rows left behind by other runs.
pub fn scratch_ordinal() -> i32 {
    (uuid::Uuid::new_v4().as_u128() % 1_000_000_000) as i32 + 1_000_000
}
