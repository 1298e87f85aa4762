use thiserror::Error;
use models::errors::ModelError;

use super::domain::{ConflictTarget, PartitionKey};

/// Failures of ordinal and name bookkeeping.
#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("allocation conflict on {0}")]
    AllocationConflict(ConflictTarget),
    #[error("could not allocate a free slot after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("ordinal {ordinal} is already taken in partition {partition}")]
    DestinationOccupied { partition: PartitionKey, ordinal: i32 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl OrderingError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            OrderingError::InvalidInput(_) => 2001,
            OrderingError::AllocationConflict(_) => 2002,
            OrderingError::AllocationExhausted { .. } => 2003,
            OrderingError::DestinationOccupied { .. } => 2004,
            OrderingError::NotFound(_) => 2005,
            OrderingError::Repository(_) => 2100,
        }
    }

    /// Whether trying the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderingError::AllocationConflict(_) | OrderingError::AllocationExhausted { .. })
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id} not found"))
    }
}

/// Map a models-layer failure, naming the conflicting field when the violated index is known.
pub fn from_model_error(err: ModelError, order_constraint: &str, name_constraint: Option<&str>) -> OrderingError {
    match err {
        ModelError::Validation(msg) => OrderingError::InvalidInput(msg),
        ModelError::UniqueViolation { constraint } => {
            let target = match constraint.as_deref() {
                Some(c) if c == order_constraint => ConflictTarget::Ordinal,
                Some(c) if Some(c) == name_constraint => ConflictTarget::Name,
                _ => ConflictTarget::Unknown,
            };
            OrderingError::AllocationConflict(target)
        }
        ModelError::ForeignKeyViolation(msg) => OrderingError::InvalidInput(format!("missing parent row: {msg}")),
        ModelError::Db(msg) => OrderingError::Repository(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_map_to_targets() {
        let ordinal = from_model_error(
            ModelError::UniqueViolation { constraint: Some("uniq_category_order".into()) },
            "uniq_category_order",
            Some("uniq_category_name_key"),
        );
        assert!(matches!(ordinal, OrderingError::AllocationConflict(ConflictTarget::Ordinal)));

        let name = from_model_error(
            ModelError::UniqueViolation { constraint: Some("uniq_category_name_key".into()) },
            "uniq_category_order",
            Some("uniq_category_name_key"),
        );
        assert!(matches!(name, OrderingError::AllocationConflict(ConflictTarget::Name)));

        let unknown = from_model_error(ModelError::UniqueViolation { constraint: None }, "uniq_store_category_order", None);
        assert!(matches!(unknown, OrderingError::AllocationConflict(ConflictTarget::Unknown)));
    }

    #[test]
    fn validation_is_invalid_input_and_not_retryable() {
        let err = from_model_error(ModelError::Validation("name required".into()), "x", None);
        assert!(matches!(err, OrderingError::InvalidInput(_)));
        assert!(!err.is_retryable());
        assert_eq!(err.code(), 2001);
        assert!(OrderingError::AllocationExhausted { attempts: 5 }.is_retryable());
    }
}
