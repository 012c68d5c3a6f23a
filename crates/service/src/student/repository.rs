use async_trait::async_trait;
use models::errors::ModelError;

use super::domain::{NewStudent, Student, StudentPatch};

/// Repository abstraction for student persistence.
///
/// Implementations must enforce email uniqueness themselves and report a
/// rejected write as `ModelError::ConstraintViolation`, leaving stored state
/// untouched.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, candidate: NewStudent) -> Result<Student, ModelError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Student>, ModelError>;
    /// Newest first by creation time; `id` breaks ties the same way.
    async fn find_all(&self) -> Result<Vec<Student>, ModelError>;
    async fn merge_and_save(&self, existing: Student, patch: StudentPatch) -> Result<Student, ModelError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;
    use models::student::{next_updated_at, now_timestamp};

    #[derive(Default)]
    struct State {
        rows: BTreeMap<i32, Student>, // key: id
        last_id: i32,
    }

    #[derive(Default)]
    pub struct MockStudentRepository {
        state: Mutex<State>,
    }

    impl MockStudentRepository {
        fn lock(&self) -> Result<MutexGuard<'_, State>, ModelError> {
            self.state.lock().map_err(|_| ModelError::Db("mock repository lock poisoned".into()))
        }

        fn email_taken(state: &State, email: &str, except: Option<i32>) -> bool {
            state.rows.values().any(|s| s.email == email && Some(s.id) != except)
        }
    }

    #[async_trait]
    impl StudentRepository for MockStudentRepository {
        async fn insert(&self, candidate: NewStudent) -> Result<Student, ModelError> {
            let mut state = self.lock()?;
            if Self::email_taken(&state, &candidate.email, None) {
                return Err(ModelError::ConstraintViolation("students.email".into()));
            }
            state.last_id += 1;
            let now = now_timestamp().with_timezone(&Utc);
            let student = Student {
                id: state.last_id,
                first_name: candidate.first_name,
                last_name: candidate.last_name,
                email: candidate.email,
                enrollment_date: candidate.enrollment_date,
                created_at: now,
                updated_at: now,
            };
            state.rows.insert(student.id, student.clone());
            Ok(student)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Student>, ModelError> {
            Ok(self.lock()?.rows.get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Student>, ModelError> {
            let mut all: Vec<Student> = self.lock()?.rows.values().cloned().collect();
            all.sort_by_key(|s| std::cmp::Reverse((s.created_at, s.id)));
            Ok(all)
        }

        async fn merge_and_save(&self, existing: Student, patch: StudentPatch) -> Result<Student, ModelError> {
            let mut state = self.lock()?;
            if let Some(email) = &patch.email {
                if Self::email_taken(&state, email, Some(existing.id)) {
                    return Err(ModelError::ConstraintViolation("students.email".into()));
                }
            }
            let row = state
                .rows
                .get_mut(&existing.id)
                .ok_or_else(|| ModelError::Db(format!("no row with id {}", existing.id)))?;
            if let Some(v) = patch.first_name { row.first_name = v; }
            if let Some(v) = patch.last_name { row.last_name = v; }
            if let Some(v) = patch.email { row.email = v; }
            if let Some(v) = patch.enrollment_date { row.enrollment_date = v; }
            row.updated_at = next_updated_at(row.updated_at.into()).with_timezone(&Utc);
            Ok(row.clone())
        }
    }
}
