//! Statement plans for multi-row ordinal rewrites.
//!
//! Postgres checks non-deferrable unique indexes per statement, so every plan first moves the
//! rows it is about to rewrite onto distinct negative parking ordinals, then writes final values.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::domain::{PartitionKey, Slot, SlotWrite};
use super::errors::OrderingError;

/// Highest value usable for parking: below every ordinal present, and below zero.
pub fn parking_floor(slots: &[Slot]) -> i32 {
    slots.iter().map(|s| s.ordinal).min().unwrap_or(0).min(0)
}

/// The `index`-th parking ordinal under `floor`.
pub fn parking_ordinal(floor: i32, index: usize) -> i32 {
    let offset = i32::try_from(index).unwrap_or(i32::MAX);
    floor.saturating_sub(1).saturating_sub(offset)
}

/// Exchange ordinals of `target` and `occupant` (same partition) without a transient duplicate.
pub fn swap_plan(target: &Slot, occupant: &Slot, floor: i32) -> Vec<SlotWrite> {
    let partition = target.partition;
    vec![
        SlotWrite { id: occupant.id, partition, ordinal: parking_ordinal(floor, 0) },
        SlotWrite { id: target.id, partition, ordinal: occupant.ordinal },
        SlotWrite { id: occupant.id, partition, ordinal: target.ordinal },
    ]
}

/// Sort by (ordinal, created_at), with id as the last tie-breaker.
pub fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(|a, b| {
        a.ordinal
            .cmp(&b.ordinal)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

/// Renumber a partition to `1..=N`, keeping relative order.
///
/// Returns the final layout and the writes needed to reach it; rows already in place are not
/// touched, so compacting a compact partition yields no writes.
pub fn compaction_plan(slots: &[Slot]) -> (Vec<Slot>, Vec<SlotWrite>) {
    let mut ordered = slots.to_vec();
    sort_slots(&mut ordered);

    let mut moves = Vec::new();
    for (i, slot) in ordered.iter_mut().enumerate() {
        let target = i32::try_from(i + 1).unwrap_or(i32::MAX);
        if slot.ordinal != target {
            moves.push((slot.id, slot.partition, target));
            slot.ordinal = target;
        }
    }
    (ordered, park_then_write(slots, &moves))
}

/// Apply an explicit `id -> ordinal` assignment to part of a partition.
///
/// Every id must belong to `members`; targets must be positive, distinct, and not held by a
/// member outside the assignment.
pub fn reorder_plan(
    partition: PartitionKey,
    members: &[Slot],
    assignments: &[(Uuid, i32)],
) -> Result<(Vec<Slot>, Vec<SlotWrite>), OrderingError> {
    let by_id: HashMap<Uuid, &Slot> = members.iter().map(|s| (s.id, s)).collect();
    let mut seen_ids = HashSet::new();
    let mut seen_targets = HashSet::new();
    for &(id, ordinal) in assignments {
        if ordinal <= 0 {
            return Err(OrderingError::InvalidInput(format!("ordinal must be positive, got {ordinal}")));
        }
        if !by_id.contains_key(&id) {
            return Err(OrderingError::not_found("member", format!("{id} in partition {partition}")));
        }
        if !seen_ids.insert(id) {
            return Err(OrderingError::InvalidInput(format!("{id} assigned more than once")));
        }
        if !seen_targets.insert(ordinal) {
            return Err(OrderingError::InvalidInput(format!("ordinal {ordinal} assigned more than once")));
        }
    }
    if let Some(holder) = members
        .iter()
        .find(|s| !seen_ids.contains(&s.id) && seen_targets.contains(&s.ordinal))
    {
        return Err(OrderingError::InvalidInput(format!(
            "ordinal {} is held by {} which is not part of the reorder",
            holder.ordinal, holder.id
        )));
    }

    let moves: Vec<(Uuid, PartitionKey, i32)> = assignments
        .iter()
        .filter(|(id, ordinal)| by_id[id].ordinal != *ordinal)
        .map(|&(id, ordinal)| (id, partition, ordinal))
        .collect();

    let targets: HashMap<Uuid, i32> = assignments.iter().copied().collect();
    let mut layout: Vec<Slot> = members
        .iter()
        .map(|s| Slot { ordinal: targets.get(&s.id).copied().unwrap_or(s.ordinal), ..s.clone() })
        .collect();
    sort_slots(&mut layout);
    Ok((layout, park_then_write(members, &moves)))
}

fn park_then_write(members: &[Slot], moves: &[(Uuid, PartitionKey, i32)]) -> Vec<SlotWrite> {
    if moves.is_empty() {
        return Vec::new();
    }
    let floor = parking_floor(members);
    let parked = moves
        .iter()
        .enumerate()
        .map(|(i, &(id, partition, _))| SlotWrite { id, partition, ordinal: parking_ordinal(floor, i) });
    let finals = moves
        .iter()
        .map(|&(id, partition, ordinal)| SlotWrite { id, partition, ordinal });
    parked.chain(finals).collect()
}
