//! Maintenance windows: creation rules, activity lookup and deletion.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::db::entities::{maintenance_window, prelude::*};

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_WINDOWS_PER_PROJECT: usize = 50;

pub fn max_window_duration() -> Duration {
    Duration::days(7)
}

#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    #[error("{0}")]
    InvalidTitle(&'static str),
    #[error("invalid {0}")]
    InvalidTimestamp(&'static str),
    #[error("start_time must be before end_time")]
    InvalidInterval,
    #[error("maintenance window cannot be longer than 7 days")]
    DurationTooLong,
    #[error("too many maintenance windows (max 50)")]
    TooManyWindows,
    #[error("overlapping maintenance window")]
    OverlappingWindow,
    #[error("maintenance window not found")]
    NotFound,
    #[error("maintenance window does not belong to this project")]
    Forbidden,
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
}

#[derive(Debug, Clone)]
pub struct NewMaintenanceWindow {
    pub title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A missing title counts as blank. Returns the trimmed title.
pub fn validate_title(title: Option<&str>) -> Result<String, MaintenanceError> {
    let title = title.unwrap_or_default().trim();
    if title.is_empty() {
        return Err(MaintenanceError::InvalidTitle("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(MaintenanceError::InvalidTitle("title is too long (max 100 characters)"));
    }
    Ok(title.to_string())
}

/// Checks a new window against the rules and against the project's existing windows.
/// Returns the trimmed title on success.
pub fn validate_window(
    new_window: &NewMaintenanceWindow,
    existing: &[maintenance_window::Model],
) -> Result<String, MaintenanceError> {
    let title = validate_title(new_window.title.as_deref())?;

    let (start, end) = (new_window.start_time, new_window.end_time);
    if start >= end {
        return Err(MaintenanceError::InvalidInterval);
    }
    if end - start > max_window_duration() {
        return Err(MaintenanceError::DurationTooLong);
    }
    if existing.len() >= MAX_WINDOWS_PER_PROJECT {
        return Err(MaintenanceError::TooManyWindows);
    }
    if existing.iter().any(|w| w.overlaps(start, end)) {
        return Err(MaintenanceError::OverlappingWindow);
    }

    Ok(title)
}

async fn windows_for_project<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
) -> Result<Vec<maintenance_window::Model>, DbErr> {
    let mut windows = MaintenanceWindow::find()
        .filter(maintenance_window::Column::ProjectId.eq(project_id))
        .all(db)
        .await?;
    windows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
    Ok(windows)
}

pub async fn active_window_exists<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    at: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let windows = windows_for_project(db, project_id).await?;
    Ok(windows.iter().any(|w| w.is_active(at)))
}

pub async fn list_windows(
    db: &DatabaseConnection,
    project_id: i32,
    active_only: bool,
    at: DateTime<Utc>,
) -> Result<Vec<maintenance_window::Model>, DbErr> {
    let windows = windows_for_project(db, project_id).await?;
    if active_only {
        Ok(windows.into_iter().filter(|w| w.is_active(at)).collect())
    } else {
        Ok(windows)
    }
}

pub async fn create_window(
    db: &DatabaseConnection,
    project_id: i32,
    new_window: NewMaintenanceWindow,
) -> Result<maintenance_window::Model, MaintenanceError> {
    let txn = db.begin().await?;

    // Serializes concurrent creates for one project so the count and overlap
    // checks see every committed window. SQLite ignores the lock clause.
    Project::find_by_id(project_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("project {project_id}")))?;

    let existing = windows_for_project(&txn, project_id).await?;
    let title = validate_window(&new_window, &existing)?;

    let saved = maintenance_window::ActiveModel {
        code: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        title: Set(title),
        start_time: Set(new_window.start_time),
        end_time: Set(new_window.end_time),
        created: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        project_id = project_id,
        window = %saved.code,
        start_time = %saved.start_time,
        end_time = %saved.end_time,
        "Maintenance window created."
    );
    Ok(saved)
}

pub async fn delete_window(
    db: &DatabaseConnection,
    project_id: i32,
    code: Uuid,
) -> Result<(), MaintenanceError> {
    let window = MaintenanceWindow::find()
        .filter(maintenance_window::Column::Code.eq(code))
        .one(db)
        .await?
        .ok_or(MaintenanceError::NotFound)?;

    if window.project_id != project_id {
        return Err(MaintenanceError::Forbidden);
    }

    window.delete(db).await?;
    info!(project_id = project_id, window = %code, "Maintenance window deleted.");
    Ok(())
}
