use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::db::services;
use crate::web::models::bulk_models::{BulkActionRequest, BulkActionResponse};
use crate::web::models::AuthenticatedProject;
use crate::web::{AppError, AppState};

async fn bulk_action_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BulkActionResponse>, AppError> {
    let Json(body) = payload?;
    let command = BulkActionRequest::from(body).validate()?;
    let response = services::apply_bulk_action(&app_state.db_pool, project.id, command).await?;
    Ok(Json(response))
}

pub fn create_bulk_router() -> Router<Arc<AppState>> {
    Router::new().route("/checks/bulk/", post(bulk_action_handler))
}
