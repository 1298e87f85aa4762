use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope inside which order numbers (and names, where a table has them) must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartitionKey {
    /// Single table-wide partition (categories, site contacts).
    Global,
    /// Rows sharing a parent id (stores of a category, images of a store).
    Scoped(Uuid),
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionKey::Global => f.write_str("global"),
            PartitionKey::Scoped(id) => write!(f, "{id}"),
        }
    }
}

/// Ordering view of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub partition: PartitionKey,
    pub ordinal: i32,
    pub created_at: DateTime<Utc>,
}

/// One statement of a transactional ordinal rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWrite {
    pub id: Uuid,
    pub partition: PartitionKey,
    pub ordinal: i32,
}

/// Which unique index rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictTarget {
    Ordinal,
    Name,
    /// The store did not say which index fired.
    Unknown,
}

impl fmt::Display for ConflictTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictTarget::Ordinal => f.write_str("ordinal"),
            ConflictTarget::Name => f.write_str("name"),
            ConflictTarget::Unknown => f.write_str("unknown"),
        }
    }
}

/// Where a new row should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Lowest free ordinal starting from 1.
    #[default]
    FirstFree,
    /// First free ordinal at or above the given one.
    At(i32),
    /// One past the current maximum.
    End,
}

impl From<Option<i32>> for Placement {
    fn from(preferred: Option<i32>) -> Self {
        preferred.map_or(Placement::FirstFree, Placement::At)
    }
}

/// Values handed to a create attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: Option<String>,
    pub ordinal: i32,
}

/// Result of a relocate: the moved row and, for a swap, the row that took its old ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub slot: Slot,
    pub displaced: Option<Slot>,
}
