//! JSA step entity. Always accessed through its parent JSA.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jsa_steps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub jsa_id: i32,
    /// 1-based position within the parent, unique per `jsa_id`.
    pub step_order: i32,
    pub description: String,
    pub hazards: String,
    pub controls: String,
    pub risk_level_before: Option<String>,
    pub risk_level_after: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jsa::Entity",
        from = "Column::JsaId",
        to = "super::jsa::Column::Id",
        on_delete = "Cascade"
    )]
    Jsa,
}

impl Related<super::jsa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jsa.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
