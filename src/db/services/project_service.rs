use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::db::entities::{check, flip, maintenance_window, project, prelude::*};

pub async fn create_project(
    db: &DatabaseConnection,
    name: &str,
    api_key: &str,
) -> Result<project::Model, DbErr> {
    project::ActiveModel {
        name: Set(name.to_string()),
        api_key: Set(api_key.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_project_by_api_key<C: ConnectionTrait>(
    db: &C,
    api_key: &str,
) -> Result<Option<project::Model>, DbErr> {
    Project::find()
        .filter(project::Column::ApiKey.eq(api_key))
        .one(db)
        .await
}

/// Deletes a project together with its checks, their flips and its maintenance windows.
/// The foreign keys cascade as well; the explicit deletes keep backends without
/// enforced foreign keys free of orphans.
pub async fn delete_project(db: &DatabaseConnection, project_id: i32) -> Result<u64, DbErr> {
    let txn = db.begin().await?;

    let check_ids: Vec<i32> = Check::find()
        .filter(check::Column::ProjectId.eq(project_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    if !check_ids.is_empty() {
        Flip::delete_many()
            .filter(flip::Column::CheckId.is_in(check_ids))
            .exec(&txn)
            .await?;
    }
    Check::delete_many()
        .filter(check::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;
    MaintenanceWindow::delete_many()
        .filter(maintenance_window::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;
    let result = Project::delete_by_id(project_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(result.rows_affected)
}
