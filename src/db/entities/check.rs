use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::checks::tag_set::{self, TagError};
use crate::db::enums::CheckStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: Uuid,
    #[sea_orm(indexed)]
    pub project_id: i32,
    pub name: String,
    // Space separated, exactly as stored. Use `clean_tags` for the normalized view.
    pub tags: String,
    pub status: CheckStatus,
    pub last_ping: Option<ChronoDateTimeUtc>,
    pub last_start: Option<ChronoDateTimeUtc>,
    pub alert_after: Option<ChronoDateTimeUtc>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade", // Deleting a project removes its checks
        on_update = "Cascade"
    )]
    Project,

    #[sea_orm(has_many = "super::flip::Entity")]
    Flip,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::flip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn clean_tags(&self) -> Vec<String> {
        tag_set::clean_tags(&self.tags)
    }

    /// Returns `Ok(false)` without touching `tags` when the tag is already present.
    pub fn add_tag(&mut self, tag: &str) -> Result<bool, TagError> {
        match tag_set::add_tag(&self.tags, tag)? {
            Some(updated) => {
                self.tags = updated;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match tag_set::remove_tag(&self.tags, tag) {
            Some(updated) => {
                self.tags = updated;
                true
            }
            None => false,
        }
    }

    /// Leaves `tags` untouched on error.
    pub fn bulk_tags_add<I, S>(&mut self, tags: I) -> Result<(), TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tag_set::bulk_tags_add(&self.tags, tags)?;
        Ok(())
    }

    pub fn bulk_tags_remove<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tag_set::bulk_tags_remove(&self.tags, tags);
    }
}
