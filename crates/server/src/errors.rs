use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::{FieldError, ServiceError};
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{statusCode, error, message, details?}`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    title: &'static str,
    message: Option<String>,
    details: Option<Vec<FieldError>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status_code: u16,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message, details: None }
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status(&self) -> StatusCode { self.status }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            error: self.title,
            message: self.message.as_deref(),
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some("Validation failed".into()))
                    .with_details(fields)
            }
            ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Storage(inner) => {
                // detail stays in the log, not in the response
                error!(code = 1200, error = %inner, "storage failure");
                JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    Some("Internal server error".into()),
                )
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(r.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(_: PathRejection) -> Self {
        JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Bad Request",
            Some("Validation failed (numeric string is expected)".into()),
        )
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::invalid("email", "email must be an email"), StatusCode::BAD_REQUEST),
            (ServiceError::email_taken(), StatusCode::CONFLICT),
            (ServiceError::not_found(3), StatusCode::NOT_FOUND),
            (ServiceError::Storage(ModelError::Db("boom".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status(), status);
        }
    }

    #[test]
    fn storage_detail_is_not_exposed() {
        let e = JsonApiError::from(ServiceError::Storage(ModelError::Db("password authentication failed".into())));
        assert_eq!(e.message.as_deref(), Some("Internal server error"));
    }
}
