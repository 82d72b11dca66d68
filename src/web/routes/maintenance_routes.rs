use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::db::services::{self, MaintenanceError};
use crate::web::models::maintenance_models::{
    CreateMaintenanceWindowRequest, ListMaintenanceWindowsQuery, MaintenanceWindowDetails,
    MaintenanceWindowListResponse,
};
use crate::web::models::AuthenticatedProject;
use crate::web::routes::parse_code;
use crate::web::{AppError, AppState};

async fn list_windows_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListMaintenanceWindowsQuery>,
) -> Result<Json<MaintenanceWindowListResponse>, AppError> {
    let windows =
        services::list_windows(&app_state.db_pool, project.id, query.active_only(), Utc::now())
            .await?;
    Ok(Json(MaintenanceWindowListResponse {
        windows: windows.into_iter().map(MaintenanceWindowDetails::from).collect(),
    }))
}

async fn create_window_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MaintenanceWindowDetails>), AppError> {
    let Json(body) = payload?;
    let new_window = CreateMaintenanceWindowRequest::from(body).into_new_window()?;
    let window = services::create_window(&app_state.db_pool, project.id, new_window).await?;
    Ok((StatusCode::CREATED, Json(window.into())))
}

async fn delete_window_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    let code = parse_code(&code).ok_or(MaintenanceError::NotFound)?;
    services::delete_window(&app_state.db_pool, project.id, code).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_maintenance_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/maintenance/", get(list_windows_handler).post(create_window_handler))
        .route("/maintenance/{code}/", delete(delete_window_handler))
}
