use anyhow::Result;
use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::db::{connect_with_config, DatabaseConfig};
use crate::errors::ModelError;
use crate::student::{self, Changes};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn create_and_find() -> Result<()> {
    let db = setup_test_db().await?;

    let created = student::create(&db, "Ada", "Lovelace", "ada@example.com", date(2024, 1, 1)).await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.created_at, created.updated_at);

    let found = student::find(&db, created.id).await?.expect("row exists");
    assert_eq!(found.first_name, "Ada");
    assert_eq!(found.email, "ada@example.com");
    assert_eq!(found.enrollment_date, date(2024, 1, 1));

    assert!(student::find(&db, 99).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_constraint_violation() -> Result<()> {
    let db = setup_test_db().await?;

    student::create(&db, "Ada", "Lovelace", "ada@example.com", date(2024, 1, 1)).await?;
    let err = student::create(&db, "Other", "Person", "ada@example.com", date(2024, 2, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::ConstraintViolation(_)), "got {err:?}");
    assert_eq!(student::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn list_orders_by_creation() -> Result<()> {
    let db = setup_test_db().await?;

    for (i, first) in ["A", "B", "C"].iter().enumerate() {
        student::create(&db, first, "Test", &format!("s{i}@example.com"), date(2024, 1, 1)).await?;
    }

    let newest: Vec<i32> = student::list(&db).await?.into_iter().map(|s| s.id).collect();
    assert_eq!(newest, vec![3, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn apply_changes_touches_only_given_columns() -> Result<()> {
    let db = setup_test_db().await?;

    let ada = student::create(&db, "Ada", "Lovelace", "ada@example.com", date(2024, 1, 1)).await?;
    let changes = Changes { last_name: Some("King".into()), ..Changes::default() };
    let updated = student::apply_changes(&db, ada.id, ada.updated_at, changes).await?;

    assert_eq!(updated.last_name, "King");
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.email, "ada@example.com");
    assert_eq!(updated.created_at, ada.created_at);
    assert!(updated.updated_at > ada.updated_at);
    Ok(())
}

#[tokio::test]
async fn apply_changes_rejects_taken_email() -> Result<()> {
    let db = setup_test_db().await?;

    student::create(&db, "Ada", "Lovelace", "ada@example.com", date(2024, 1, 1)).await?;
    let grace = student::create(&db, "Grace", "Hopper", "grace@example.com", date(2024, 1, 2)).await?;

    let changes = Changes { email: Some("ada@example.com".into()), ..Changes::default() };
    let err = student::apply_changes(&db, grace.id, grace.updated_at, changes).await.unwrap_err();
    assert!(matches!(err, ModelError::ConstraintViolation(_)), "got {err:?}");

    let after = student::find(&db, grace.id).await?.expect("row exists");
    assert_eq!(after.email, "grace@example.com");
    assert_eq!(after.updated_at, grace.updated_at);
    Ok(())
}
