use models::errors::ModelError;
use serde::Serialize;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(ModelError),
}

fn summarize(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}

impl ServiceError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Student with ID {id} not found"))
    }

    pub fn email_taken() -> Self { Self::Conflict("Email already exists".into()) }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Map a failed insert/update. Only the unique-constraint case is recovered.
    pub fn from_write(e: ModelError) -> Self {
        match e {
            ModelError::ConstraintViolation(_) => Self::email_taken(),
            ModelError::Validation(msg) => Self::invalid("body", msg),
            other => Self::Storage(other),
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Storage(_) => 1200,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self { Self::Storage(e) }
}
