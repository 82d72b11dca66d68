use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use crate::checks::tag_set::{self, TagSet};
use crate::db::entities::{check, prelude::*};
use crate::db::services::check_service::{find_owned_check, CheckServiceError};
use crate::web::models::check_models::TagCount;

// --- Tag Service Functions ---

pub async fn list_check_tags(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
) -> Result<Vec<String>, CheckServiceError> {
    let check = find_owned_check(db, project_id, code).await?;
    Ok(check.clean_tags())
}

/// Adds a single tag. Returns whether the tag was new together with the resulting tag list.
/// Nothing is written when the tag was already present.
pub async fn add_tag_to_check(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
    tag: &str,
) -> Result<(bool, Vec<String>), CheckServiceError> {
    tag_set::validate_tag(tag)?;

    let txn = db.begin().await?;
    let mut check = find_owned_check(&txn, project_id, code).await?;
    let added = check.add_tag(tag)?;
    let tags = check.clean_tags();

    if added {
        let mut active: check::ActiveModel = check.clone().into();
        active.tags = Set(check.tags);
        active.update(&txn).await?;
        txn.commit().await?;
        info!(project_id = project_id, check = %code, tag = tag, "Tag added to check.");
    }

    Ok((added, tags))
}

pub async fn remove_tag_from_check(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
    tag: &str,
) -> Result<(), CheckServiceError> {
    tag_set::validate_tag(tag)?;

    let txn = db.begin().await?;
    let mut check = find_owned_check(&txn, project_id, code).await?;
    if !check.remove_tag(tag) {
        return Err(CheckServiceError::TagNotFound);
    }

    let mut active: check::ActiveModel = check.clone().into();
    active.tags = Set(check.tags);
    active.update(&txn).await?;
    txn.commit().await?;

    info!(project_id = project_id, check = %code, tag = tag, "Tag removed from check.");
    Ok(())
}

/// Retrieves every tag used in the project with the number of checks carrying it,
/// sorted by name and optionally restricted to a prefix.
pub async fn get_project_tags_with_count(
    db: &DatabaseConnection,
    project_id: i32,
    prefix: Option<&str>,
) -> Result<Vec<TagCount>, CheckServiceError> {
    let checks = Check::find()
        .filter(check::Column::ProjectId.eq(project_id))
        .all(db)
        .await?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for check in &checks {
        let tags = TagSet::parse(&check.tags);
        for tag in tags.iter() {
            if prefix.is_some_and(|p| !tag.starts_with(p)) {
                continue;
            }
            *counts.entry(tag.to_string()).or_default() += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|(name, count)| TagCount { name, count })
        .collect())
}
