use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::db::services::{self, CheckServiceError};
use crate::web::models::check_models::{CheckDetails, CheckListResponse};
use crate::web::models::AuthenticatedProject;
use crate::web::routes::parse_code;
use crate::web::{AppError, AppState};

async fn list_checks_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<CheckListResponse>, AppError> {
    let checks = services::list_checks(&app_state.db_pool, project.id).await?;
    Ok(Json(CheckListResponse { checks }))
}

async fn get_check_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CheckDetails>, AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    let check = services::get_check(&app_state.db_pool, project.id, code).await?;
    Ok(Json(check))
}

async fn pause_check_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CheckDetails>, AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    let check = services::pause_check(&app_state.db_pool, project.id, code).await?;
    Ok(Json(check))
}

async fn resume_check_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CheckDetails>, AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    let check = services::resume_check(&app_state.db_pool, project.id, code).await?;
    Ok(Json(check))
}

async fn delete_check_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    services::delete_check(&app_state.db_pool, project.id, code).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_checks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/checks/", get(list_checks_handler))
        .route("/checks/{code}/", get(get_check_handler).delete(delete_check_handler))
        .route("/checks/{code}/pause/", post(pause_check_handler))
        .route("/checks/{code}/resume/", post(resume_check_handler))
}

