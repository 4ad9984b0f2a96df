//! JSA (job safety analysis) entity, the aggregate root for its steps.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jsa")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub task: String,
    pub location_id: Option<i32>,
    pub department: Option<String>,
    pub responsible_person_id: Option<i32>,
    pub team_members: Option<String>,
    pub required_ppe: Option<String>,
    /// One of `JsaStatus::as_str()`.
    pub status: String,
    pub review_date: Option<Date>,
    /// Public attachment reference, e.g. `/uploads/jsa/<file>`.
    pub attachment_path: Option<String>,
    /// Incremented on every update; used for optimistic concurrency.
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::ResponsiblePersonId",
        to = "super::employee::Column::Id",
        on_delete = "SetNull"
    )]
    ResponsiblePerson,
    #[sea_orm(has_many = "super::jsa_step::Entity")]
    Steps,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResponsiblePerson.def()
    }
}

impl Related<super::jsa_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
