//! Service layer for the storefront directory.
//! - `ordering` keeps order numbers unique and dense per partition.
//! - The `*_service` modules are the category, store, contact and image flows built on it.
//! - Reuses validation and entity definitions in `models` crate.

pub mod errors;
pub mod ordering;
pub mod slug;
pub mod category_service;
pub mod store_service;
pub mod contact_service;
pub mod image_service;
#[cfg(test)]
pub mod test_support;
