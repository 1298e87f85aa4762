use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{PartitionKey, Slot, SlotWrite};
use super::errors::OrderingError;

/// Persistence seam for ordinal bookkeeping.
///
/// Implementations must enforce uniqueness of `(partition, ordinal)` (and of the name key for
/// named tables) and report violations as [`OrderingError::AllocationConflict`].
#[async_trait]
pub trait OrdinalRepository: Send + Sync {
    async fn find_slot(&self, id: Uuid) -> Result<Option<Slot>, OrderingError>;
    /// Members of a partition sorted by `(ordinal, created_at)`.
    async fn list_slots(&self, partition: PartitionKey) -> Result<Vec<Slot>, OrderingError>;
    /// Stored display names of a partition; empty for tables without names.
    async fn list_names(&self, partition: PartitionKey) -> Result<Vec<String>, OrderingError>;
    /// Execute `writes` in order inside one transaction; nothing is kept if any statement fails.
    async fn apply(&self, writes: &[SlotWrite]) -> Result<(), OrderingError>;
}

/// In-memory repository for tests and doc examples.
///
/// Checks uniqueness after every statement, like a store with non-deferrable unique indexes.
pub mod mock {
    use super::*;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Utc};

    use crate::ordering::domain::ConflictTarget;
    use crate::ordering::names::name_key;

    #[derive(Debug, Clone)]
    struct Row {
        slot: Slot,
        name: Option<String>,
    }

    #[derive(Default)]
    pub struct MockOrdinalRepository {
        rows: Mutex<Vec<Row>>,
        // errors returned by upcoming `apply` calls, ahead of any real work
        injected: Mutex<VecDeque<OrderingError>>,
        ticks: AtomicUsize,
        statements: AtomicUsize,
    }

    impl MockOrdinalRepository {
        pub fn new() -> Self { Self::default() }

        fn next_created_at(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
            DateTime::<Utc>::from_timestamp(1_700_000_000 + tick, 0).unwrap_or_default()
        }

        /// Insert a row, failing like a unique index would.
        pub fn insert(&self, partition: PartitionKey, ordinal: i32, name: Option<&str>) -> Result<Slot, OrderingError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.slot.partition == partition && r.slot.ordinal == ordinal) {
                return Err(OrderingError::AllocationConflict(ConflictTarget::Ordinal));
            }
            if let Some(n) = name {
                let key = name_key(n);
                if rows
                    .iter()
                    .any(|r| r.slot.partition == partition && r.name.as_deref().map(name_key).as_deref() == Some(key.as_str()))
                {
                    return Err(OrderingError::AllocationConflict(ConflictTarget::Name));
                }
            }
            let slot = Slot { id: Uuid::new_v4(), partition, ordinal, created_at: self.next_created_at() };
            rows.push(Row { slot: slot.clone(), name: name.map(str::to_string) });
            Ok(slot)
        }

        /// Queue an error for the next `apply`, simulating a concurrent writer.
        pub fn inject_apply_error(&self, err: OrderingError) {
            self.injected.lock().unwrap().push_back(err);
        }

        /// Statements executed by successful `apply` calls so far.
        pub fn statements(&self) -> usize {
            self.statements.load(Ordering::SeqCst)
        }

        pub fn ordinal_of(&self, id: Uuid) -> Option<i32> {
            self.rows.lock().unwrap().iter().find(|r| r.slot.id == id).map(|r| r.slot.ordinal)
        }

        fn check_unique(rows: &[Row]) -> bool {
            let mut seen = HashSet::new();
            rows.iter().all(|r| seen.insert((r.slot.partition, r.slot.ordinal)))
        }
    }

    #[async_trait]
    impl OrdinalRepository for MockOrdinalRepository {
        async fn find_slot(&self, id: Uuid) -> Result<Option<Slot>, OrderingError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.slot.id == id).map(|r| r.slot.clone()))
        }

        async fn list_slots(&self, partition: PartitionKey) -> Result<Vec<Slot>, OrderingError> {
            let rows = self.rows.lock().unwrap();
            let mut slots: Vec<Slot> = rows.iter().filter(|r| r.slot.partition == partition).map(|r| r.slot.clone()).collect();
            slots.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then(a.created_at.cmp(&b.created_at)));
            Ok(slots)
        }

        async fn list_names(&self, partition: PartitionKey) -> Result<Vec<String>, OrderingError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().filter(|r| r.slot.partition == partition).filter_map(|r| r.name.clone()).collect())
        }

        async fn apply(&self, writes: &[SlotWrite]) -> Result<(), OrderingError> {
            if let Some(err) = self.injected.lock().unwrap().pop_front() {
                return Err(err);
            }
            let mut rows = self.rows.lock().unwrap();
            // work on a copy so a failed statement rolls everything back
            let mut staged = rows.clone();
            for w in writes {
                let row = staged
                    .iter_mut()
                    .find(|r| r.slot.id == w.id)
                    .ok_or_else(|| OrderingError::not_found("row", w.id))?;
                row.slot.partition = w.partition;
                row.slot.ordinal = w.ordinal;
                if !Self::check_unique(&staged) {
                    return Err(OrderingError::AllocationConflict(ConflictTarget::Ordinal));
                }
            }
            *rows = staged;
            self.statements.fetch_add(writes.len(), Ordering::SeqCst);
            Ok(())
        }
    }
}
