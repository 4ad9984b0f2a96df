//! Create jsa table.
//!
//! Location and responsible person references are nulled when the
//! referenced row is deleted.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_locations::Location;
use super::m20250301_000002_create_employees::Employee;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jsa::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Jsa::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Jsa::Task).text().not_null())
                    .col(ColumnDef::new(Jsa::LocationId).integer())
                    .col(ColumnDef::new(Jsa::Department).string())
                    .col(ColumnDef::new(Jsa::ResponsiblePersonId).integer())
                    .col(ColumnDef::new(Jsa::TeamMembers).text())
                    .col(ColumnDef::new(Jsa::RequiredPpe).text())
                    .col(
                        ColumnDef::new(Jsa::Status)
                            .string_len(20)
                            .not_null()
                            .default("Draft"),
                    )
                    .col(ColumnDef::new(Jsa::ReviewDate).date())
                    .col(ColumnDef::new(Jsa::AttachmentPath).string())
                    .col(ColumnDef::new(Jsa::Version).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Jsa::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Jsa::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Jsa::Table, Jsa::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Jsa::Table, Jsa::ResponsiblePersonId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jsa_created_at")
                    .table(Jsa::Table)
                    .col(Jsa::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jsa::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Jsa {
    Table,
    Id,
    Task,
    LocationId,
    Department,
    ResponsiblePersonId,
    TeamMembers,
    RequiredPpe,
    Status,
    ReviewDate,
    AttachmentPath,
    Version,
    CreatedAt,
    UpdatedAt,
}
