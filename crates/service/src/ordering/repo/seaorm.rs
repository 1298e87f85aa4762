use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use models::errors::ModelError;

use crate::ordering::domain::{PartitionKey, Slot, SlotWrite};
use crate::ordering::errors::{from_model_error, OrderingError};
use crate::ordering::repository::OrdinalRepository;

pub type ColumnOf<T> = <<T as OrderedTable>::Entity as EntityTrait>::Column;
pub type ModelOf<T> = <<T as OrderedTable>::Entity as EntityTrait>::Model;

/// Describes how a table stores its ordering columns.
pub trait OrderedTable: Sized + Send + Sync + 'static {
    type Entity: EntityTrait;

    /// Human-readable table name for errors and logs.
    const LABEL: &'static str;
    /// Unique index over `(partition, order_number)`.
    const ORDER_CONSTRAINT: &'static str;
    /// Unique index over the name key, for named tables.
    const NAME_CONSTRAINT: Option<&'static str> = None;

    fn id_column() -> ColumnOf<Self>;
    fn order_column() -> ColumnOf<Self>;
    fn created_column() -> ColumnOf<Self>;
    /// Parent-id column, or `None` for a table that is one global partition.
    fn partition_column() -> Option<ColumnOf<Self>>;
    fn to_slot(model: &ModelOf<Self>) -> Slot;
    fn name_of(_model: &ModelOf<Self>) -> Option<String> { None }
}

/// SeaORM-backed repository, one instance per ordered table.
pub struct SeaOrmOrdinalRepository<T: OrderedTable> {
    pub db: DatabaseConnection,
    _table: PhantomData<T>,
}

impl<T: OrderedTable> SeaOrmOrdinalRepository<T> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, _table: PhantomData }
    }

    pub fn map_err(err: DbErr) -> OrderingError {
        from_model_error(ModelError::from_db(err), T::ORDER_CONSTRAINT, T::NAME_CONSTRAINT)
    }

    fn partition_filter(partition: PartitionKey) -> Result<Condition, OrderingError> {
        match (T::partition_column(), partition) {
            (None, PartitionKey::Global) => Ok(Condition::all()),
            (Some(col), PartitionKey::Scoped(key)) => Ok(Condition::all().add(col.eq(key))),
            _ => Err(OrderingError::InvalidInput(format!("{} has no partition {}", T::LABEL, partition))),
        }
    }

    /// Open a transaction for caller statements that must commit together with slot writes.
    pub async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, OrderingError> {
        db.begin().await.map_err(Self::map_err)
    }

    /// Commit `txn` when `res` is `Ok`, roll it back otherwise.
    pub async fn settle<V>(txn: DatabaseTransaction, res: Result<V, OrderingError>) -> Result<V, OrderingError> {
        match res {
            Ok(v) => {
                txn.commit().await.map_err(Self::map_err)?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = txn.rollback().await {
                    debug!(table = T::LABEL, error = %rb, "rollback_failed");
                }
                Err(e)
            }
        }
    }

    /// Execute `writes` in order on an open transaction.
    pub async fn apply_in(conn: &DatabaseTransaction, writes: &[SlotWrite]) -> Result<(), OrderingError> {
        for w in writes {
            let mut update = T::Entity::update_many().col_expr(T::order_column(), Expr::value(w.ordinal));
            match (T::partition_column(), w.partition) {
                (None, PartitionKey::Global) => {}
                (Some(col), PartitionKey::Scoped(key)) => {
                    update = update.col_expr(col, Expr::value(key));
                }
                _ => {
                    return Err(OrderingError::InvalidInput(format!("{} has no partition {}", T::LABEL, w.partition)));
                }
            }
            let res = update
                .filter(T::id_column().eq(w.id))
                .exec(conn)
                .await
                .map_err(Self::map_err)?;
            if res.rows_affected == 0 {
                return Err(OrderingError::not_found(T::LABEL, w.id));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<T: OrderedTable> OrdinalRepository for SeaOrmOrdinalRepository<T> {
    async fn find_slot(&self, id: Uuid) -> Result<Option<Slot>, OrderingError> {
        let found = T::Entity::find()
            .filter(T::id_column().eq(id))
            .one(&self.db)
            .await
            .map_err(Self::map_err)?;
        Ok(found.as_ref().map(T::to_slot))
    }

    async fn list_slots(&self, partition: PartitionKey) -> Result<Vec<Slot>, OrderingError> {
        let rows = T::Entity::find()
            .filter(Self::partition_filter(partition)?)
            .order_by_asc(T::order_column())
            .order_by_asc(T::created_column())
            .all(&self.db)
            .await
            .map_err(Self::map_err)?;
        Ok(rows.iter().map(T::to_slot).collect())
    }

    async fn list_names(&self, partition: PartitionKey) -> Result<Vec<String>, OrderingError> {
        if T::NAME_CONSTRAINT.is_none() {
            return Ok(Vec::new());
        }
        let rows = T::Entity::find()
            .filter(Self::partition_filter(partition)?)
            .all(&self.db)
            .await
            .map_err(Self::map_err)?;
        Ok(rows.iter().filter_map(T::name_of).collect())
    }

    async fn apply(&self, writes: &[SlotWrite]) -> Result<(), OrderingError> {
        if writes.is_empty() {
            return Ok(());
        }
        let txn = Self::begin(&self.db).await?;
        let res = Self::apply_in(&txn, writes).await;
        Self::settle(txn, res).await?;
        debug!(table = T::LABEL, statements = writes.len(), "ordinal_writes_committed");
        Ok(())
    }
}

pub(crate) fn utc(ts: &sea_orm::prelude::DateTimeWithTimeZone) -> DateTime<Utc> {
    ts.with_timezone(&Utc)
}
