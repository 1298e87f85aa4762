use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::allocator;
use super::domain::{Candidate, ConflictTarget, PartitionKey, Placement, Relocation, Slot, SlotWrite};
use super::errors::OrderingError;
use super::names;
use super::plan;
use super::repository::OrdinalRepository;

/// Ordering service configuration
#[derive(Clone, Debug)]
pub struct OrderingPolicy {
    pub scan_window: u32,
    pub max_attempts: u32,
    pub name_suffix_limit: u32,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        Self { scan_window: 1000, max_attempts: 5, name_suffix_limit: 200 }
    }
}

impl From<&configs::OrderingConfig> for OrderingPolicy {
    fn from(cfg: &configs::OrderingConfig) -> Self {
        Self { scan_window: cfg.scan_window, max_attempts: cfg.max_attempts, name_suffix_limit: cfg.name_suffix_limit }
    }
}

/// Keeps order numbers unique and dense within partitions, independent of the table behind `R`.
pub struct OrderingService<R: OrdinalRepository> {
    repo: Arc<R>,
    policy: OrderingPolicy,
}

fn validate_ordinal(n: i32) -> Result<(), OrderingError> {
    if n <= 0 {
        return Err(OrderingError::InvalidInput(format!("ordinal must be positive, got {n}")));
    }
    Ok(())
}

impl<R: OrdinalRepository> OrderingService<R> {
    pub fn new(repo: Arc<R>, policy: OrderingPolicy) -> Self { Self { repo, policy } }

    pub fn policy(&self) -> &OrderingPolicy { &self.policy }

    /// Ordinal free in `partition` at observation time.
    ///
    /// # Examples
    /// ```
    /// use service::ordering::{OrderingService, OrderingPolicy, PartitionKey, Placement};
    /// use service::ordering::repository::mock::MockOrdinalRepository;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockOrdinalRepository::new());
    /// for n in 1..=3 { repo.insert(PartitionKey::Global, n, None).unwrap(); }
    /// let svc = OrderingService::new(repo, OrderingPolicy::default());
    /// let got = tokio_test::block_on(svc.allocate(PartitionKey::Global, Placement::At(1))).unwrap();
    /// assert_eq!(got, 4);
    /// ```
    pub async fn allocate(&self, partition: PartitionKey, placement: Placement) -> Result<i32, OrderingError> {
        if let Placement::At(n) = placement {
            validate_ordinal(n)?;
        }
        let used = allocator::used_ordinals(&self.repo.list_slots(partition).await?);
        allocator::place(&used, placement, self.policy.scan_window)
            .ok_or_else(|| OrderingError::InvalidInput(format!("no ordinal left in partition {partition}")))
    }

    /// Name unused in `partition` at observation time (case and whitespace insensitive).
    pub async fn resolve_name(&self, partition: PartitionKey, desired: &str) -> Result<String, OrderingError> {
        let existing = self.repo.list_names(partition).await?;
        names::resolve_name(desired, &existing, self.policy.name_suffix_limit)
    }

    /// Create a row through `write`, retrying with fresh values when a unique index rejects it.
    ///
    /// `write` receives the candidate name (when `desired_name` is given) and ordinal and must
    /// report uniqueness failures as [`OrderingError::AllocationConflict`]. Only the conflicting
    /// field is recomputed; an unknown target recomputes both. Any other error ends the loop.
    #[instrument(skip(self, desired_name, write), fields(partition = %partition))]
    pub async fn create_with_retry<T, F, Fut>(
        &self,
        partition: PartitionKey,
        desired_name: Option<&str>,
        placement: Placement,
        mut write: F,
    ) -> Result<T, OrderingError>
    where
        F: FnMut(Candidate) -> Fut,
        Fut: Future<Output = Result<T, OrderingError>>,
    {
        let name = match desired_name {
            Some(n) => Some(self.resolve_name(partition, n).await?),
            None => None,
        };
        let ordinal = self.allocate(partition, placement).await?;
        let mut candidate = Candidate { name, ordinal };

        let max = self.policy.max_attempts;
        for attempt in 1..=max {
            let target = match write(candidate.clone()).await {
                Ok(created) => {
                    info!(attempt, ordinal = candidate.ordinal, "ordered_row_created");
                    return Ok(created);
                }
                Err(OrderingError::AllocationConflict(target)) => target,
                Err(e) => return Err(e),
            };
            debug!(attempt, %target, ordinal = candidate.ordinal, "create_conflict");
            if attempt == max {
                break;
            }
            let renamed = matches!(target, ConflictTarget::Name | ConflictTarget::Unknown);
            let renumbered = target != ConflictTarget::Name || desired_name.is_none();
            if renamed {
                if let Some(n) = desired_name {
                    candidate.name = Some(self.resolve_name(partition, n).await?);
                }
            }
            if renumbered {
                let next = candidate.ordinal.checked_add(1).unwrap_or(candidate.ordinal);
                candidate.ordinal = self.allocate(partition, Placement::At(next)).await?;
            }
        }
        warn!(attempts = max, "create_allocation_exhausted");
        Err(OrderingError::AllocationExhausted { attempts: max })
    }

    /// Move a row to `desired` and/or into `destination`.
    ///
    /// Inside one partition an occupied target is swapped with the row's old ordinal. Moving to
    /// another partition keeps the current ordinal unless `desired` is given, and never displaces
    /// a row there: an occupied destination is [`OrderingError::DestinationOccupied`].
    #[instrument(skip(self), fields(id = %id))]
    pub async fn relocate(
        &self,
        id: Uuid,
        desired: Option<i32>,
        destination: Option<PartitionKey>,
    ) -> Result<Relocation, OrderingError> {
        if let Some(n) = desired {
            validate_ordinal(n)?;
        }
        self.with_retry("relocate", || self.relocate_once(id, desired, destination)).await
    }

    /// Plan a relocate without writing: the resulting layout and the statements reaching it.
    ///
    /// Lets callers run the statements in their own transaction next to other column updates.
    /// An empty plan means the row is already in place.
    pub async fn plan_relocation(
        &self,
        id: Uuid,
        desired: Option<i32>,
        destination: Option<PartitionKey>,
    ) -> Result<(Relocation, Vec<SlotWrite>), OrderingError> {
        if let Some(n) = desired {
            validate_ordinal(n)?;
        }
        let slot = self.repo.find_slot(id).await?.ok_or_else(|| OrderingError::not_found("entity", id))?;
        let dest = destination.unwrap_or(slot.partition);
        let same_partition = dest == slot.partition;
        let target = desired.unwrap_or(slot.ordinal);
        if same_partition && target == slot.ordinal {
            return Ok((Relocation { slot, displaced: None }, Vec::new()));
        }

        let members = self.repo.list_slots(dest).await?;
        let occupant = members.iter().find(|s| s.ordinal == target && s.id != id);
        let (writes, displaced) = match occupant {
            Some(occ) if same_partition => {
                let writes = plan::swap_plan(&slot, occ, plan::parking_floor(&members));
                (writes, Some(Slot { ordinal: slot.ordinal, ..occ.clone() }))
            }
            Some(_) => return Err(OrderingError::DestinationOccupied { partition: dest, ordinal: target }),
            None => (vec![SlotWrite { id, partition: dest, ordinal: target }], None),
        };
        debug!(statements = writes.len(), from = slot.ordinal, to = target, "relocate_plan");
        Ok((Relocation { slot: Slot { partition: dest, ordinal: target, ..slot }, displaced }, writes))
    }

    async fn relocate_once(
        &self,
        id: Uuid,
        desired: Option<i32>,
        destination: Option<PartitionKey>,
    ) -> Result<Relocation, OrderingError> {
        let (moved, writes) = self.plan_relocation(id, desired, destination).await?;
        if writes.is_empty() {
            return Ok(moved);
        }
        self.repo.apply(&writes).await?;
        info!(
            partition = %moved.slot.partition,
            to = moved.slot.ordinal,
            swapped = moved.displaced.is_some(),
            "entity_relocated"
        );
        Ok(moved)
    }

    /// Renumber `partition` to `1..=N` keeping order by `(ordinal, created_at)`.
    /// Returns the final layout.
    #[instrument(skip(self), fields(partition = %partition))]
    pub async fn compact(&self, partition: PartitionKey) -> Result<Vec<Slot>, OrderingError> {
        self.with_retry("compact", || async move {
            let members = self.repo.list_slots(partition).await?;
            let (layout, writes) = plan::compaction_plan(&members);
            if !writes.is_empty() {
                self.repo.apply(&writes).await?;
            }
            info!(members = layout.len(), statements = writes.len(), "partition_compacted");
            Ok(layout)
        })
        .await
    }

    /// Assign explicit ordinals to a subset of `partition` in one transaction.
    #[instrument(skip(self, assignments), fields(partition = %partition, count = assignments.len()))]
    pub async fn reorder(&self, partition: PartitionKey, assignments: &[(Uuid, i32)]) -> Result<Vec<Slot>, OrderingError> {
        self.with_retry("reorder", || async move {
            let members = self.repo.list_slots(partition).await?;
            let (layout, writes) = plan::reorder_plan(partition, &members, assignments)?;
            if !writes.is_empty() {
                self.repo.apply(&writes).await?;
            }
            info!(statements = writes.len(), "partition_reordered");
            Ok(layout)
        })
        .await
    }

    /// Re-run `f` while a concurrent writer wins the race, up to `max_attempts`.
    ///
    /// `f` must recompute everything it writes on each call; only
    /// [`OrderingError::AllocationConflict`] is retried.
    pub async fn with_retry<T, F, Fut>(&self, op: &'static str, mut f: F) -> Result<T, OrderingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OrderingError>>,
    {
        let max = self.policy.max_attempts;
        for attempt in 1..=max {
            match f().await {
                Err(OrderingError::AllocationConflict(target)) => {
                    debug!(op, attempt, %target, "ordering_conflict_retry");
                }
                other => return other,
            }
        }
        warn!(op, attempts = max, "ordering_retries_exhausted");
        Err(OrderingError::AllocationExhausted { attempts: max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::repository::mock::MockOrdinalRepository;
    use std::collections::HashSet;

    fn setup() -> (Arc<MockOrdinalRepository>, OrderingService<MockOrdinalRepository>) {
        let repo = Arc::new(MockOrdinalRepository::new());
        let svc = OrderingService::new(repo.clone(), OrderingPolicy::default());
        (repo, svc)
    }

    async fn ordinals(repo: &MockOrdinalRepository, p: PartitionKey) -> Vec<i32> {
        repo.list_slots(p).await.unwrap().iter().map(|s| s.ordinal).collect()
    }

    #[tokio::test]
    async fn allocator_skips_taken_preference() {
        let (repo, svc) = setup();
        for n in 1..=3 {
            repo.insert(PartitionKey::Global, n, None).unwrap();
        }
        assert_eq!(svc.allocate(PartitionKey::Global, Placement::At(1)).await.unwrap(), 4);
        assert_eq!(svc.allocate(PartitionKey::Scoped(Uuid::new_v4()), Placement::FirstFree).await.unwrap(), 1);
        let err = svc.allocate(PartitionKey::Global, Placement::At(0)).await.unwrap_err();
        assert!(matches!(err, OrderingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn swap_exchanges_two_rows_only() {
        let (repo, svc) = setup();
        let p = PartitionKey::Scoped(Uuid::new_v4());
        let a = repo.insert(p, 3, None).unwrap();
        let b = repo.insert(p, 7, None).unwrap();
        let c = repo.insert(p, 1, None).unwrap();

        let moved = svc.relocate(a.id, Some(7), None).await.unwrap();
        assert_eq!(moved.slot.ordinal, 7);
        assert_eq!(moved.displaced.as_ref().map(|s| (s.id, s.ordinal)), Some((b.id, 3)));
        assert_eq!(repo.ordinal_of(a.id), Some(7));
        assert_eq!(repo.ordinal_of(b.id), Some(3));
        assert_eq!(repo.ordinal_of(c.id), Some(1));
    }

    #[tokio::test]
    async fn relocate_to_free_slot_is_single_write() {
        let (repo, svc) = setup();
        let a = repo.insert(PartitionKey::Global, 2, None).unwrap();
        svc.relocate(a.id, Some(9), None).await.unwrap();
        assert_eq!(repo.ordinal_of(a.id), Some(9));
        assert_eq!(repo.statements(), 1);
    }

    #[tokio::test]
    async fn relocate_same_ordinal_is_noop() {
        let (repo, svc) = setup();
        let a = repo.insert(PartitionKey::Global, 2, None).unwrap();
        let out = svc.relocate(a.id, Some(2), None).await.unwrap();
        assert_eq!(out.slot.ordinal, 2);
        assert_eq!(repo.statements(), 0);
        let out = svc.relocate(a.id, None, None).await.unwrap();
        assert!(out.displaced.is_none());
        assert_eq!(repo.statements(), 0);
    }

    #[tokio::test]
    async fn relocate_unknown_id_is_not_found() {
        let (_repo, svc) = setup();
        let err = svc.relocate(Uuid::new_v4(), Some(1), None).await.unwrap_err();
        assert!(matches!(err, OrderingError::NotFound(_)));
        let err = svc.relocate(Uuid::new_v4(), Some(-1), None).await.unwrap_err();
        assert!(matches!(err, OrderingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn cross_partition_move_keeps_ordinal_or_fails() {
        let (repo, svc) = setup();
        let from = PartitionKey::Scoped(Uuid::new_v4());
        let to = PartitionKey::Scoped(Uuid::new_v4());
        let mover = repo.insert(from, 2, None).unwrap();
        let blocker = repo.insert(to, 2, None).unwrap();

        let err = svc.relocate(mover.id, None, Some(to)).await.unwrap_err();
        assert!(matches!(err, OrderingError::DestinationOccupied { ordinal: 2, .. }));
        assert_eq!(repo.ordinal_of(mover.id), Some(2));
        assert_eq!(repo.find_slot(mover.id).await.unwrap().unwrap().partition, from);

        // explicit but occupied target is refused as well
        let err = svc.relocate(mover.id, Some(2), Some(to)).await.unwrap_err();
        assert!(matches!(err, OrderingError::DestinationOccupied { .. }));

        repo.apply(&[SlotWrite { id: blocker.id, partition: to, ordinal: 5 }]).await.unwrap();
        let moved = svc.relocate(mover.id, None, Some(to)).await.unwrap();
        assert_eq!(moved.slot.partition, to);
        assert_eq!(moved.slot.ordinal, 2);
    }

    #[tokio::test]
    async fn compaction_is_dense_ordered_and_idempotent() {
        let (repo, svc) = setup();
        let p = PartitionKey::Global;
        let five = repo.insert(p, 5, None).unwrap();
        let one = repo.insert(p, 1, None).unwrap();
        let nine = repo.insert(p, 9, None).unwrap();

        let layout = svc.compact(p).await.unwrap();
        assert_eq!(layout.iter().map(|s| s.id).collect::<Vec<_>>(), vec![one.id, five.id, nine.id]);
        assert_eq!(ordinals(&repo, p).await, vec![1, 2, 3]);

        let before = repo.statements();
        let again = svc.compact(p).await.unwrap();
        assert_eq!(again, layout);
        assert_eq!(repo.statements(), before);
    }

    #[tokio::test]
    async fn name_resolution_is_case_and_space_insensitive() {
        let (repo, svc) = setup();
        repo.insert(PartitionKey::Global, 1, Some("Shop")).unwrap();
        repo.insert(PartitionKey::Global, 2, Some("Shop (2)")).unwrap();
        assert_eq!(svc.resolve_name(PartitionKey::Global, "Shop").await.unwrap(), "Shop (3)");
        assert_eq!(svc.resolve_name(PartitionKey::Global, "  shop  ").await.unwrap(), "Shop (3)");
    }

    #[tokio::test]
    async fn create_retries_only_the_conflicting_field() {
        let (repo, svc) = setup();
        let p = PartitionKey::Global;
        repo.insert(p, 1, Some("Cafe")).unwrap();

        let mut seen = Vec::new();
        let mut first = true;
        let created = svc
            .create_with_retry(p, Some("Cafe"), Placement::FirstFree, |cand| {
                seen.push(cand.clone());
                let lose_race = std::mem::take(&mut first);
                let repo = repo.clone();
                async move {
                    if lose_race {
                        // a concurrent writer grabs the ordinal between allocation and insert
                        repo.insert(p, cand.ordinal, None)?;
                    }
                    repo.insert(p, cand.ordinal, cand.name.as_deref())
                }
            })
            .await
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Candidate { name: Some("Cafe (2)".into()), ordinal: 2 });
        assert_eq!(seen[1], Candidate { name: Some("Cafe (2)".into()), ordinal: 3 });
        assert_eq!(created.ordinal, 3);
    }

    #[tokio::test]
    async fn create_gives_up_after_max_attempts() {
        let (_repo, svc) = setup();
        let mut calls = 0u32;
        let err = svc
            .create_with_retry(PartitionKey::Global, None, Placement::FirstFree, |_cand| {
                calls += 1;
                async { Err::<(), _>(OrderingError::AllocationConflict(ConflictTarget::Ordinal)) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderingError::AllocationExhausted { attempts: 5 }));
        assert_eq!(calls, 5);
    }

    #[tokio::test]
    async fn create_does_not_retry_invalid_input() {
        let (_repo, svc) = setup();
        let mut calls = 0u32;
        let err = svc
            .create_with_retry(PartitionKey::Global, None, Placement::FirstFree, |_cand| {
                calls += 1;
                async { Err::<(), _>(OrderingError::InvalidInput("slug required".into())) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderingError::InvalidInput(_)));
        assert_eq!(calls, 1);

        let err = svc
            .create_with_retry(PartitionKey::Global, Some("   "), Placement::FirstFree, |_cand| async { Ok(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn name_conflict_keeps_ordinal_and_renames() {
        let (repo, svc) = setup();
        let p = PartitionKey::Global;
        repo.insert(p, 1, Some("Cafe")).unwrap();

        let mut seen = Vec::new();
        let mut first = true;
        let created = svc
            .create_with_retry(p, Some("Cafe"), Placement::FirstFree, |cand| {
                seen.push(cand.clone());
                let lose_race = std::mem::take(&mut first);
                let repo = repo.clone();
                async move {
                    if lose_race {
                        // a concurrent writer takes the resolved name at another position
                        repo.insert(p, 50, Some("cafe (2)"))?;
                    }
                    repo.insert(p, cand.ordinal, cand.name.as_deref())
                }
            })
            .await
            .unwrap();

        assert_eq!(seen[0], Candidate { name: Some("Cafe (2)".into()), ordinal: 2 });
        assert_eq!(seen[1], Candidate { name: Some("Cafe (3)".into()), ordinal: 2 });
        assert_eq!(created.ordinal, 2);
        assert_eq!(repo.list_names(p).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_conflict_recomputes_both_fields() {
        let (repo, svc) = setup();
        let p = PartitionKey::Global;
        repo.insert(p, 1, Some("Spa")).unwrap();

        let mut seen = Vec::new();
        let mut first = true;
        svc.create_with_retry(p, Some("Spa"), Placement::FirstFree, |cand| {
            seen.push(cand.clone());
            let lose_race = std::mem::take(&mut first);
            let repo = repo.clone();
            async move {
                if lose_race {
                    repo.insert(p, cand.ordinal, cand.name.as_deref())?;
                    return Err(OrderingError::AllocationConflict(ConflictTarget::Unknown));
                }
                repo.insert(p, cand.ordinal, cand.name.as_deref())
            }
        })
        .await
        .unwrap();

        assert_eq!(seen[0], Candidate { name: Some("Spa (2)".into()), ordinal: 2 });
        assert_eq!(seen[1], Candidate { name: Some("Spa (3)".into()), ordinal: 3 });
    }

    #[tokio::test]
    async fn name_conflict_without_name_renumbers() {
        let (_repo, svc) = setup();
        let mut seen = Vec::new();
        let created = svc
            .create_with_retry(PartitionKey::Global, None, Placement::FirstFree, |cand| {
                seen.push(cand.clone());
                let attempt = seen.len();
                async move {
                    if attempt == 1 {
                        return Err(OrderingError::AllocationConflict(ConflictTarget::Name));
                    }
                    Ok(cand.ordinal)
                }
            })
            .await
            .unwrap();
        assert_eq!(seen[0], Candidate { name: None, ordinal: 1 });
        assert_eq!(seen[1], Candidate { name: None, ordinal: 2 });
        assert_eq!(created, 2);
    }

    #[tokio::test]
    async fn failed_statement_mid_plan_keeps_prior_state() {
        let (repo, _svc) = setup();
        let p = PartitionKey::Global;
        let a = repo.insert(p, 3, None).unwrap();
        let b = repo.insert(p, 7, None).unwrap();
        let c = repo.insert(p, 5, None).unwrap();

        // park B, then move A onto C's ordinal
        let writes = [
            SlotWrite { id: b.id, partition: p, ordinal: -1 },
            SlotWrite { id: a.id, partition: p, ordinal: 5 },
            SlotWrite { id: b.id, partition: p, ordinal: 3 },
        ];
        let err = repo.apply(&writes).await.unwrap_err();
        assert!(matches!(err, OrderingError::AllocationConflict(ConflictTarget::Ordinal)));
        assert_eq!(repo.ordinal_of(a.id), Some(3));
        assert_eq!(repo.ordinal_of(b.id), Some(7));
        assert_eq!(repo.ordinal_of(c.id), Some(5));
        assert_eq!(repo.statements(), 0);
    }

    #[tokio::test]
    async fn plan_relocation_writes_nothing() {
        let (repo, svc) = setup();
        let p = PartitionKey::Global;
        let a = repo.insert(p, 3, None).unwrap();
        let b = repo.insert(p, 7, None).unwrap();

        let (moved, writes) = svc.plan_relocation(a.id, Some(7), None).await.unwrap();
        assert_eq!(writes.len(), 3);
        assert_eq!(moved.displaced.map(|d| d.id), Some(b.id));
        assert_eq!(repo.ordinal_of(a.id), Some(3));
        assert_eq!(repo.statements(), 0);

        let (_, none) = svc.plan_relocation(a.id, Some(3), None).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn relocate_retries_after_lost_race() {
        let (repo, svc) = setup();
        let a = repo.insert(PartitionKey::Global, 1, None).unwrap();
        repo.inject_apply_error(OrderingError::AllocationConflict(ConflictTarget::Ordinal));
        let out = svc.relocate(a.id, Some(4), None).await.unwrap();
        assert_eq!(out.slot.ordinal, 4);
        assert_eq!(repo.ordinal_of(a.id), Some(4));
    }

    #[tokio::test]
    async fn relocate_exhausts_under_constant_contention() {
        let (repo, svc) = setup();
        let a = repo.insert(PartitionKey::Global, 1, None).unwrap();
        for _ in 0..5 {
            repo.inject_apply_error(OrderingError::AllocationConflict(ConflictTarget::Ordinal));
        }
        let err = svc.relocate(a.id, Some(4), None).await.unwrap_err();
        assert!(matches!(err, OrderingError::AllocationExhausted { attempts: 5 }));
        assert_eq!(repo.ordinal_of(a.id), Some(1));
    }

    #[tokio::test]
    async fn reorder_applies_permutation() {
        let (repo, svc) = setup();
        let p = PartitionKey::Scoped(Uuid::new_v4());
        let a = repo.insert(p, 1, None).unwrap();
        let b = repo.insert(p, 2, None).unwrap();
        let c = repo.insert(p, 3, None).unwrap();
        let layout = svc.reorder(p, &[(a.id, 3), (b.id, 1), (c.id, 2)]).await.unwrap();
        assert_eq!(layout.iter().map(|s| s.id).collect::<Vec<_>>(), vec![b.id, c.id, a.id]);
        assert_eq!(repo.ordinal_of(a.id), Some(3));
    }

    #[tokio::test]
    async fn uniqueness_holds_across_mixed_operations() {
        let (repo, svc) = setup();
        let p = PartitionKey::Global;
        let mut ids = Vec::new();
        for n in [4, 8, 15, 16, 23, 42] {
            ids.push(repo.insert(p, n, None).unwrap().id);
        }
        svc.relocate(ids[0], Some(23), None).await.unwrap();
        svc.relocate(ids[5], Some(1), None).await.unwrap();
        svc.compact(p).await.unwrap();
        svc.relocate(ids[2], Some(6), None).await.unwrap();
        let got = ordinals(&repo, p).await;
        let distinct: HashSet<i32> = got.iter().copied().collect();
        assert_eq!(distinct.len(), got.len());
        assert_eq!(got, vec![1, 2, 3, 4, 5, 6]);
    }
}
