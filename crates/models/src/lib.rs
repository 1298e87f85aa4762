//! SeaORM entities for the directory tables whose rows carry an `order_number`.
pub mod errors;
pub mod db;
pub mod category;
pub mod store;
pub mod site_contact;
pub mod store_image;

/// Order numbers written through the models layer are always positive.
pub fn validate_order_number(n: i32) -> Result<(), errors::ModelError> {
    if n <= 0 { return Err(errors::ModelError::Validation("order_number must be > 0".into())); }
    Ok(())
}

#[cfg(test)]
mod tests;
