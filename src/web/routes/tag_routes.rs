use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::db::services::{self, CheckServiceError};
use crate::web::models::check_models::{
    AddTagResponse, CheckTagsResponse, ProjectTagsQuery, ProjectTagsResponse,
};
use crate::web::models::AuthenticatedProject;
use crate::web::routes::parse_code;
use crate::web::{AppError, AppState};

async fn list_check_tags_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CheckTagsResponse>, AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    let tags = services::list_check_tags(&app_state.db_pool, project.id, code).await?;
    Ok(Json(CheckTagsResponse { tags }))
}

async fn add_check_tag_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path((code, tag)): Path<(String, String)>,
) -> Result<(StatusCode, Json<AddTagResponse>), AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    let (added, tags) =
        services::add_tag_to_check(&app_state.db_pool, project.id, code, &tag).await?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(AddTagResponse { added, tags })))
}

async fn remove_check_tag_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Path((code, tag)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let code = parse_code(&code).ok_or(CheckServiceError::CheckNotFound)?;
    services::remove_tag_from_check(&app_state.db_pool, project.id, code, &tag).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn project_tags_handler(
    Extension(project): Extension<AuthenticatedProject>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ProjectTagsQuery>,
) -> Result<Json<ProjectTagsResponse>, AppError> {
    let prefix = query.prefix.as_deref().filter(|p| !p.is_empty());
    let tags = services::get_project_tags_with_count(&app_state.db_pool, project.id, prefix).await?;
    Ok(Json(ProjectTagsResponse { tags }))
}

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/checks/{code}/tags/", get(list_check_tags_handler))
        .route(
            "/checks/{code}/tags/{tag}/",
            post(add_check_tag_handler).delete(remove_check_tag_handler),
        )
        .route("/tags/", get(project_tags_handler))
}
