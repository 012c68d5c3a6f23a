use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{CreateStudentInput, Student, UpdateStudentInput};
use super::repository::StudentRepository;
use crate::errors::ServiceError;

/// Student business service independent of web framework
pub struct StudentService<R: StudentRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: StudentRepository + ?Sized> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and store a new student.
    ///
    /// # Examples
    /// ```
    /// use service::student::{service::StudentService, repository::mock::MockStudentRepository};
    /// use service::student::domain::CreateStudentInput;
    /// use std::sync::Arc;
    /// let svc = StudentService::new(Arc::new(MockStudentRepository::default()));
    /// let input = CreateStudentInput {
    ///     first_name: Some("Ada".into()),
    ///     last_name: Some("Lovelace".into()),
    ///     email: Some("ada@example.com".into()),
    ///     enrollment_date: Some("2024-01-01".into()),
    /// };
    /// let student = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(student.id, 1);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateStudentInput) -> Result<Student, ServiceError> {
        let candidate = input.validate().map_err(ServiceError::Validation)?;
        let email = candidate.email.clone();
        let student = self.repo.insert(candidate).await.map_err(|e| {
            debug!(%email, error = %e, "insert rejected");
            ServiceError::from_write(e)
        })?;
        info!(student_id = student.id, email = %student.email, "student_created");
        Ok(student)
    }

    /// Every student, most recently created first.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Student>, ServiceError> {
        let students = self.repo.find_all().await?;
        debug!(count = students.len(), "students listed");
        Ok(students)
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i64) -> Result<Student, ServiceError> {
        let key = check_id(id)?;
        self.repo
            .find_by_id(key)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))
    }

    /// Apply the provided fields of `input` to student `id`.
    ///
    /// # Examples
    /// ```
    /// use service::student::{service::StudentService, repository::mock::MockStudentRepository};
    /// use service::student::domain::{CreateStudentInput, UpdateStudentInput};
    /// use std::sync::Arc;
    /// let svc = StudentService::new(Arc::new(MockStudentRepository::default()));
    /// let ada = tokio_test::block_on(svc.create(CreateStudentInput {
    ///     first_name: Some("Ada".into()),
    ///     last_name: Some("Lovelace".into()),
    ///     email: Some("ada@example.com".into()),
    ///     enrollment_date: Some("2024-01-01".into()),
    /// })).unwrap();
    /// let patch = UpdateStudentInput { last_name: Some("King".into()), ..Default::default() };
    /// let updated = tokio_test::block_on(svc.update(ada.id.into(), patch)).unwrap();
    /// assert_eq!(updated.last_name, "King");
    /// assert_eq!(updated.first_name, "Ada");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: UpdateStudentInput) -> Result<Student, ServiceError> {
        let patch = input.validate().map_err(ServiceError::Validation)?;
        let existing = self.find_one(id).await?;
        let fields = patch.fields();
        let student = self
            .repo
            .merge_and_save(existing, patch)
            .await
            .map_err(ServiceError::from_write)?;
        info!(student_id = student.id, ?fields, "student_updated");
        Ok(student)
    }
}

/// Ids are positive; anything beyond the column range cannot exist.
fn check_id(id: i64) -> Result<i32, ServiceError> {
    if id <= 0 {
        return Err(ServiceError::invalid("id", "id must be a positive integer"));
    }
    i32::try_from(id).map_err(|_| ServiceError::not_found(id))
}
