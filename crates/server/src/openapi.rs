use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDoc {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "2024-01-01")]
    pub enrollment_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(example = "2024-01-01")]
    pub enrollment_date: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub enrollment_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = 404)]
    pub status_code: u16,
    #[schema(example = "Not Found")]
    pub error: String,
    pub message: Option<String>,
    pub details: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::create,
        crate::routes::students::list,
        crate::routes::students::get,
        crate::routes::students::update,
    ),
    components(
        schemas(
            HealthResponse,
            StudentDoc,
            CreateStudentRequest,
            UpdateStudentRequest,
            FieldErrorDoc,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "students")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_student_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/students"));
        assert!(doc.paths.paths.contains_key("/students/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
