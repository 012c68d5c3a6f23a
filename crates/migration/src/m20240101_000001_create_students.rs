//! Create `students` table.
//!
//! `email` carries the unique constraint the service relies on to detect
//! duplicates; it is never checked in application code first.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_auto(Students::Id))
                    .col(string_len(Students::FirstName, 100).not_null())
                    .col(string_len(Students::LastName, 100).not_null())
                    .col(string_len(Students::Email, 100).unique_key().not_null())
                    .col(date(Students::EnrollmentDate).not_null())
                    .col(timestamp_with_time_zone(Students::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Students::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Students::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Students { Table, Id, FirstName, LastName, Email, EnrollmentDate, CreatedAt, UpdatedAt }
