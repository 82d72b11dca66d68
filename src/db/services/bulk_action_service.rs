//! Bulk actions over a bounded set of checks.
//!
//! A request is applied in two phases that share one transaction: every target
//! is resolved and ownership-checked first, then the action is applied to all
//! of them. Any failure returns before `commit`, and dropping the transaction
//! rolls back whatever was written.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::checks::tag_set::TagError;
use crate::db::entities::{check, prelude::*};
use crate::db::services::check_service::{apply_pause, apply_resume, delete_checks};
use crate::web::models::bulk_models::{BulkAction, BulkActionResponse, BulkCommand};

#[derive(Debug, thiserror::Error)]
pub enum BulkActionError {
    #[error("invalid action")]
    InvalidAction,
    #[error("checks must be a list")]
    ChecksNotList,
    #[error("checks must not be empty")]
    EmptyChecks,
    #[error("too many checks (max 50)")]
    TooManyChecks,
    #[error("invalid check uuid")]
    InvalidCheckId,
    #[error("tags is required")]
    TagsRequired,
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error("check not found")]
    CheckNotFound(Uuid),
    #[error("check does not belong to this project")]
    Forbidden(Uuid),
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
}

/// Loads every requested check and verifies that all of them exist before
/// verifying that all of them belong to `project_id`.
async fn resolve_targets(
    txn: &DatabaseTransaction,
    project_id: i32,
    codes: &[Uuid],
) -> Result<Vec<check::Model>, BulkActionError> {
    let found: HashMap<Uuid, check::Model> = Check::find()
        .filter(check::Column::Code.is_in(codes.to_vec()))
        .all(txn)
        .await?
        .into_iter()
        .map(|c| (c.code, c))
        .collect();

    if let Some(missing) = codes.iter().find(|code| !found.contains_key(code)) {
        return Err(BulkActionError::CheckNotFound(*missing));
    }

    let mut targets = Vec::with_capacity(codes.len());
    for code in codes {
        let check = &found[code];
        if check.project_id != project_id {
            return Err(BulkActionError::Forbidden(*code));
        }
        targets.push(check.clone());
    }
    Ok(targets)
}

async fn update_tags(
    txn: &DatabaseTransaction,
    original: check::Model,
    updated_tags: String,
) -> Result<(), DbErr> {
    if original.tags == updated_tags {
        return Ok(());
    }
    let mut active: check::ActiveModel = original.into();
    active.tags = Set(updated_tags);
    active.update(txn).await?;
    Ok(())
}

/// `applied` counts changed checks for pause, resume and delete, and targeted
/// checks for the two tag actions.
pub async fn apply_bulk_action(
    db: &DatabaseConnection,
    project_id: i32,
    command: BulkCommand,
) -> Result<BulkActionResponse, BulkActionError> {
    let txn = db.begin().await?;
    let targets = resolve_targets(&txn, project_id, &command.checks).await?;
    let now = Utc::now();

    let applied = match command.action {
        BulkAction::Pause => {
            let mut changed = 0;
            for check in targets {
                if apply_pause(&txn, check, now).await? {
                    changed += 1;
                }
            }
            changed
        }
        BulkAction::Resume => {
            let mut changed = 0;
            for check in targets {
                if apply_resume(&txn, check, now).await? {
                    changed += 1;
                }
            }
            changed
        }
        BulkAction::Delete => {
            let ids = targets.iter().map(|c| c.id).collect();
            delete_checks(&txn, ids).await?
        }
        BulkAction::AddTags => {
            let count = targets.len() as u64;
            // Every check's new tags are computed before the first write.
            let mut updates = Vec::with_capacity(targets.len());
            for check in targets {
                let mut updated = check.clone();
                updated.bulk_tags_add(&command.tags)?;
                updates.push((check, updated.tags));
            }
            for (check, tags) in updates {
                debug!(check = %check.code, tags = %tags, "Adding tags.");
                update_tags(&txn, check, tags).await?;
            }
            count
        }
        BulkAction::RemoveTags => {
            let count = targets.len() as u64;
            for check in targets {
                let mut updated = check.clone();
                updated.bulk_tags_remove(&command.tags);
                update_tags(&txn, check, updated.tags).await?;
            }
            count
        }
    };

    txn.commit().await?;

    info!(
        project_id = project_id,
        action = %command.action,
        targets = command.checks.len(),
        applied = applied,
        "Bulk action applied."
    );
    Ok(BulkActionResponse {
        action: command.action,
        applied,
    })
}
