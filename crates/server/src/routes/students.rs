use axum::{
    body::Bytes,
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use service::student::domain::{CreateStudentInput, Student, UpdateStudentInput};

use crate::{errors::JsonApiError, routes::ServerState};

#[utoipa::path(
    post, path = "/students", tag = "students",
    request_body = crate::openapi::CreateStudentRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::StudentDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateStudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    let Json(input) = payload?;
    let student = state.students.create(input).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get, path = "/students", tag = "students",
    responses(
        (status = 200, description = "All students, newest first", body = [crate::openapi::StudentDoc])
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Student>>, JsonApiError> {
    Ok(Json(state.students.find_all().await?))
}

#[utoipa::path(
    get, path = "/students/{id}", tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::StudentDoc),
        (status = 400, description = "Invalid ID", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Student>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.students.find_one(id).await?))
}

#[utoipa::path(
    put, path = "/students/{id}", tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = crate::openapi::UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::StudentDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Student>, JsonApiError> {
    let Path(id) = id?;
    let input = patch_from_body(&body)?;
    Ok(Json(state.students.update(id, input).await?))
}

/// A missing body is an empty patch; anything else must be a JSON object.
fn patch_from_body(body: &[u8]) -> Result<UpdateStudentInput, JsonRejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateStudentInput::default());
    }
    let Json(input) = Json::<UpdateStudentInput>::from_bytes(body)?;
    Ok(input)
}
