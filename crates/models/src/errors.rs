use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A unique index rejected the write; `constraint` is the index name when the driver reports it.
    #[error("unique constraint violated: {}", constraint.as_deref().unwrap_or("<unknown>"))]
    UniqueViolation { constraint: Option<String> },
    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    /// Classify a SeaORM error, keeping uniqueness failures distinguishable from everything else.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                ModelError::UniqueViolation { constraint: constraint_name(&msg) }
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ModelError::ForeignKeyViolation(msg),
            _ => ModelError::Db(err.to_string()),
        }
    }
}

/// Extract the quoted constraint name from a driver message such as
/// `duplicate key value violates unique constraint "uniq_store_category_order"`.
pub fn constraint_name(message: &str) -> Option<String> {
    let marker = "constraint \"";
    let start = message.find(marker)? + marker.len();
    let rest = &message[start..];
    let end = rest.find('"')?;
    let name = &rest[..end];
    if name.is_empty() { None } else { Some(name.to_string()) }
}
