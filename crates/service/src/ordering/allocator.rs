//! Free-slot search over the ordinals a partition currently uses.

use std::collections::BTreeSet;

use super::domain::{Placement, Slot};

pub fn used_ordinals(slots: &[Slot]) -> BTreeSet<i32> {
    slots.iter().map(|s| s.ordinal).collect()
}

/// First unused ordinal at or above `preferred` (default 1), scanning at most `scan_window`
/// values before falling back to `max(used) + 1`.
///
/// The answer is only free at observation time; writers still have to handle a
/// uniqueness violation from the store.
///
/// Returns `None` only when the positive `i32` range is exhausted.
pub fn first_free(used: &BTreeSet<i32>, preferred: Option<i32>, scan_window: u32) -> Option<i32> {
    let start = preferred.unwrap_or(1).max(1);
    let window = i32::try_from(scan_window).unwrap_or(i32::MAX);
    let end = start.saturating_add(window);
    if let Some(found) = (start..end).find(|x| !used.contains(x)) {
        return Some(found);
    }
    let max = used.iter().next_back().copied().unwrap_or(0).max(0);
    max.checked_add(1)
}

/// Resolve a placement request against the used set.
pub fn place(used: &BTreeSet<i32>, placement: Placement, scan_window: u32) -> Option<i32> {
    match placement {
        Placement::FirstFree => first_free(used, None, scan_window),
        Placement::At(n) => first_free(used, Some(n), scan_window),
        Placement::End => {
            let max = used.iter().next_back().copied().unwrap_or(0).max(0);
            max.checked_add(1)
        }
    }
}
