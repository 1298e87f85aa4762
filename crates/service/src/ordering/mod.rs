//! Ordering module: unique order numbers within a partition.
//!
//! Pure planning lives in `allocator`, `names` and `plan`; `repository` is the storage seam and
//! `repo` holds its SeaORM adapter.

pub mod domain;
pub mod errors;
pub mod allocator;
pub mod names;
pub mod plan;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{ConflictTarget, PartitionKey, Placement, Relocation, Slot, SlotWrite};
pub use errors::OrderingError;
pub use service::{OrderingPolicy, OrderingService};
