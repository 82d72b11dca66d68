use axum::{
    body::{self, Body as AxumBody},
    extract::State,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::db::services::project_service;
use crate::web::models::AuthenticatedProject;
use crate::web::{AppState, error::AppError};

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Resolves the calling project from the `X-Api-Key` header, falling back to
/// an `api_key` field in a JSON body. The body is buffered and handed on intact.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let header_key = req
        .headers()
        .get(&API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let (api_key, mut req) = match header_key {
        Some(key) => (Some(key), req),
        None => {
            let (parts, body) = req.into_parts();
            let bytes = body::to_bytes(body, MAX_BODY_BYTES)
                .await
                .map_err(|e| AppError::InvalidInput(format!("could not read body: {e}")))?;
            let key = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("api_key").and_then(Value::as_str).map(str::to_string))
                .filter(|key| !key.is_empty());
            (key, Request::from_parts(parts, AxumBody::from(bytes)))
        }
    };

    let api_key = api_key.ok_or_else(|| AppError::Unauthorized("missing api key".to_string()))?;

    let project = project_service::find_project_by_api_key(&state.db_pool, &api_key)
        .await?
        .ok_or_else(|| {
            warn!(path = %req.uri().path(), "Request with unknown api key rejected.");
            AppError::Unauthorized("wrong api key".to_string())
        })?;

    req.extensions_mut().insert(AuthenticatedProject { id: project.id });
    Ok(next.run(req).await)
}
