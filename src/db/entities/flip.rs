use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use crate::db::enums::CheckStatus;

/// Audit record of a status transition caused by pause/resume.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub check_id: i32,
    pub created: ChronoDateTimeUtc,
    pub old_status: CheckStatus,
    pub new_status: CheckStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::check::Entity",
        from = "Column::CheckId",
        to = "super::check::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Check,
}

impl Related<super::check::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Check.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
