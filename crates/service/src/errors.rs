use thiserror::Error;

use crate::ordering::OrderingError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// The request clashes with existing rows (duplicate slug, category still in use).
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error(transparent)]
    Ordering(#[from] OrderingError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code; ordering failures keep their own codes.
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1004,
            ServiceError::Conflict(_) => 1009,
            ServiceError::Db(_) => 1100,
            ServiceError::Model(_) => 1101,
            ServiceError::Ordering(e) => e.code(),
        }
    }
}
