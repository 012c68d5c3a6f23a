use async_trait::async_trait;
use models::{errors::ModelError, student};
use sea_orm::DatabaseConnection;

use crate::student::domain::{NewStudent, Student, StudentPatch};
use crate::student::repository::StudentRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmStudentRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn insert(&self, candidate: NewStudent) -> Result<Student, ModelError> {
        let created = student::create(
            &self.db,
            &candidate.first_name,
            &candidate.last_name,
            &candidate.email,
            candidate.enrollment_date,
        )
        .await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Student>, ModelError> {
        Ok(student::find(&self.db, id).await?.map(Student::from))
    }

    async fn find_all(&self) -> Result<Vec<Student>, ModelError> {
        let rows = student::list(&self.db).await?;
        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn merge_and_save(&self, existing: Student, patch: StudentPatch) -> Result<Student, ModelError> {
        let updated = student::apply_changes(&self.db, existing.id, existing.updated_at.into(), patch.into()).await?;
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::NaiveDate;

    fn candidate(email: &str) -> NewStudent {
        NewStudent {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() -> Result<(), anyhow::Error> {
        let repo = SeaOrmStudentRepository { db: get_db().await? };

        let created = repo.insert(candidate("ada@example.com")).await?;
        let found = repo.find_by_id(created.id).await?.expect("stored");
        assert_eq!(found, created);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_insert_is_reported_generically() -> Result<(), anyhow::Error> {
        let repo = SeaOrmStudentRepository { db: get_db().await? };

        repo.insert(candidate("ada@example.com")).await?;
        let err = repo.insert(candidate("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ModelError::ConstraintViolation(_)), "got {err:?}");
        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn merge_keeps_omitted_fields() -> Result<(), anyhow::Error> {
        let repo = SeaOrmStudentRepository { db: get_db().await? };

        let ada = repo.insert(candidate("ada@example.com")).await?;
        let patch = StudentPatch { enrollment_date: NaiveDate::from_ymd_opt(2025, 9, 1), ..Default::default() };
        let updated = repo.merge_and_save(ada.clone(), patch).await?;
        assert_eq!(updated.enrollment_date, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(updated.first_name, ada.first_name);
        assert_eq!(updated.created_at, ada.created_at);
        assert!(updated.updated_at > ada.updated_at);
        Ok(())
    }
}
