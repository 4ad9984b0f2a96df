//! Employee entity, referenced as the responsible person on a JSA.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::jsa::Entity")]
    Jsas,
}

impl Related<super::jsa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jsas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
