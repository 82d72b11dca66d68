//! Service for reading checks and changing their paused state.
//!
//! Pause and resume live here so that single-check endpoints and bulk actions
//! share the exact same state transition and Flip bookkeeping.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::checks::tag_set::TagError;
use crate::db::entities::{check, flip, prelude::*};
use crate::db::enums::CheckStatus;
use crate::db::services::maintenance_service;
use crate::web::models::check_models::CheckDetails;

#[derive(Debug, thiserror::Error)]
pub enum CheckServiceError {
    #[error("check not found")]
    CheckNotFound,
    #[error("check does not belong to this project")]
    Forbidden,
    #[error("check is not paused")]
    NotPaused,
    #[error("tag not found")]
    TagNotFound,
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
}

#[derive(Debug, Clone)]
pub struct NewCheck {
    pub name: String,
    pub tags: String,
    pub status: CheckStatus,
}

impl Default for NewCheck {
    fn default() -> Self {
        NewCheck {
            name: String::new(),
            tags: String::new(),
            status: CheckStatus::New,
        }
    }
}

/// Registration is handled elsewhere; this is the seeding entry point.
pub async fn create_check(
    db: &DatabaseConnection,
    project_id: i32,
    new_check: NewCheck,
) -> Result<check::Model, DbErr> {
    check::ActiveModel {
        code: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        name: Set(new_check.name),
        tags: Set(new_check.tags),
        status: Set(new_check.status),
        last_ping: Set(None),
        last_start: Set(None),
        alert_after: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_check_by_code<C: ConnectionTrait>(
    db: &C,
    code: Uuid,
) -> Result<Option<check::Model>, DbErr> {
    Check::find()
        .filter(check::Column::Code.eq(code))
        .one(db)
        .await
}

/// Looks a check up by code and verifies it belongs to `project_id`.
pub async fn find_owned_check<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    code: Uuid,
) -> Result<check::Model, CheckServiceError> {
    let check = find_check_by_code(db, code)
        .await?
        .ok_or(CheckServiceError::CheckNotFound)?;
    if check.project_id != project_id {
        return Err(CheckServiceError::Forbidden);
    }
    Ok(check)
}

pub async fn record_flip<C: ConnectionTrait>(
    db: &C,
    check_id: i32,
    old_status: CheckStatus,
    new_status: CheckStatus,
    at: DateTime<Utc>,
) -> Result<flip::Model, DbErr> {
    flip::ActiveModel {
        check_id: Set(check_id),
        created: Set(at),
        old_status: Set(old_status),
        new_status: Set(new_status),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Returns `false` and writes nothing when the check is already paused.
pub async fn apply_pause<C: ConnectionTrait>(
    db: &C,
    check: check::Model,
    at: DateTime<Utc>,
) -> Result<bool, DbErr> {
    if check.status == CheckStatus::Paused {
        return Ok(false);
    }
    let (check_id, old_status) = (check.id, check.status);

    let mut active: check::ActiveModel = check.into();
    active.status = Set(CheckStatus::Paused);
    active.last_start = Set(None);
    active.alert_after = Set(None);
    active.update(db).await?;

    record_flip(db, check_id, old_status, CheckStatus::Paused, at).await?;
    Ok(true)
}

/// Returns `false` and writes nothing unless the check is paused.
pub async fn apply_resume<C: ConnectionTrait>(
    db: &C,
    check: check::Model,
    at: DateTime<Utc>,
) -> Result<bool, DbErr> {
    if check.status != CheckStatus::Paused {
        return Ok(false);
    }
    let check_id = check.id;

    let mut active: check::ActiveModel = check.into();
    active.status = Set(CheckStatus::New);
    active.last_start = Set(None);
    active.last_ping = Set(None);
    active.alert_after = Set(None);
    active.update(db).await?;

    record_flip(db, check_id, CheckStatus::Paused, CheckStatus::New, at).await?;
    Ok(true)
}

pub async fn list_checks(
    db: &DatabaseConnection,
    project_id: i32,
) -> Result<Vec<CheckDetails>, DbErr> {
    let checks = Check::find()
        .filter(check::Column::ProjectId.eq(project_id))
        .order_by_asc(check::Column::Id)
        .all(db)
        .await?;
    let in_maintenance =
        maintenance_service::active_window_exists(db, project_id, Utc::now()).await?;

    Ok(checks
        .into_iter()
        .map(|c| CheckDetails::from_model(c, in_maintenance))
        .collect())
}

pub async fn check_details(
    db: &DatabaseConnection,
    check: check::Model,
) -> Result<CheckDetails, DbErr> {
    let in_maintenance =
        maintenance_service::active_window_exists(db, check.project_id, Utc::now()).await?;
    Ok(CheckDetails::from_model(check, in_maintenance))
}

pub async fn get_check(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
) -> Result<CheckDetails, CheckServiceError> {
    let check = find_owned_check(db, project_id, code).await?;
    Ok(check_details(db, check).await?)
}

pub async fn pause_check(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
) -> Result<CheckDetails, CheckServiceError> {
    let txn = db.begin().await?;
    let check = find_owned_check(&txn, project_id, code).await?;
    let check_id = check.id;
    if apply_pause(&txn, check, Utc::now()).await? {
        info!(project_id = project_id, check = %code, "Check paused.");
    }
    txn.commit().await?;

    let check = Check::find_by_id(check_id)
        .one(db)
        .await?
        .ok_or(CheckServiceError::CheckNotFound)?;
    Ok(check_details(db, check).await?)
}

pub async fn resume_check(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
) -> Result<CheckDetails, CheckServiceError> {
    let txn = db.begin().await?;
    let check = find_owned_check(&txn, project_id, code).await?;
    let check_id = check.id;
    if !apply_resume(&txn, check, Utc::now()).await? {
        return Err(CheckServiceError::NotPaused);
    }
    txn.commit().await?;
    info!(project_id = project_id, check = %code, "Check resumed.");

    let check = Check::find_by_id(check_id)
        .one(db)
        .await?
        .ok_or(CheckServiceError::CheckNotFound)?;
    Ok(check_details(db, check).await?)
}

/// Deletes the given checks and their flips. Callers are expected to have
/// resolved ownership already.
pub async fn delete_checks<C: ConnectionTrait>(db: &C, check_ids: Vec<i32>) -> Result<u64, DbErr> {
    if check_ids.is_empty() {
        return Ok(0);
    }
    Flip::delete_many()
        .filter(flip::Column::CheckId.is_in(check_ids.clone()))
        .exec(db)
        .await?;
    let result = Check::delete_many()
        .filter(check::Column::Id.is_in(check_ids))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_check(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
) -> Result<(), CheckServiceError> {
    let txn = db.begin().await?;
    let check = find_owned_check(&txn, project_id, code).await?;
    delete_checks(&txn, vec![check.id]).await?;
    txn.commit().await?;
    info!(project_id = project_id, check = %code, "Check deleted.");
    Ok(())
}
