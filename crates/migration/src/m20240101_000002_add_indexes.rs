use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is always ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_students_created_at")
                    .table(Students::Table)
                    .col(Students::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_students_created_at").table(Students::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students { Table, CreatedAt }
