//! Create jsa_steps table.

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_jsa::Jsa;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JsaStep::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JsaStep::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JsaStep::JsaId).integer().not_null())
                    .col(ColumnDef::new(JsaStep::StepOrder).integer().not_null())
                    .col(ColumnDef::new(JsaStep::Description).text().not_null())
                    .col(ColumnDef::new(JsaStep::Hazards).text().not_null())
                    .col(ColumnDef::new(JsaStep::Controls).text().not_null())
                    .col(ColumnDef::new(JsaStep::RiskLevelBefore).string_len(50))
                    .col(ColumnDef::new(JsaStep::RiskLevelAfter).string_len(50))
                    .foreign_key(
                        ForeignKey::create()
                            .from(JsaStep::Table, JsaStep::JsaId)
                            .to(Jsa::Table, Jsa::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jsa_steps_order_unique")
                    .table(JsaStep::Table)
                    .col(JsaStep::JsaId)
                    .col(JsaStep::StepOrder)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JsaStep::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JsaStep {
    #[sea_orm(iden = "jsa_steps")]
    Table,
    Id,
    JsaId,
    StepOrder,
    Description,
    Hazards,
    Controls,
    RiskLevelBefore,
    RiskLevelAfter,
}
