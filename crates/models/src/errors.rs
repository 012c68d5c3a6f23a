use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A write was rejected by a unique constraint in the store.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    /// The bare message without the variant prefix.
    pub fn into_message(self) -> String {
        match self {
            ModelError::Validation(m) | ModelError::ConstraintViolation(m) | ModelError::Db(m) => m,
        }
    }
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ModelError::ConstraintViolation(detail),
            _ => ModelError::Db(e.to_string()),
        }
    }
}
