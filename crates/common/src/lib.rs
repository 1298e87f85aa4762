//! Cross-crate helpers shared by the service layer and the maintenance binary.

pub mod utils;
