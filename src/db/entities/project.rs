use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub api_key: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::check::Entity")]
    Check,
    #[sea_orm(has_many = "super::maintenance_window::Entity")]
    MaintenanceWindow,
}

impl Related<super::check::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Check.def()
    }
}

impl Related<super::maintenance_window::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceWindow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
