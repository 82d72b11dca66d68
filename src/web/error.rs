use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::checks::tag_set::TagError;
use crate::db::services::{BulkActionError, CheckServiceError, MaintenanceError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Database error while handling request.");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

/// Malformed JSON or a wrong content type is a client error like any other.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<TagError> for AppError {
    fn from(err: TagError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<CheckServiceError> for AppError {
    fn from(err: CheckServiceError) -> Self {
        match err {
            CheckServiceError::CheckNotFound | CheckServiceError::TagNotFound => {
                AppError::NotFound(err.to_string())
            }
            CheckServiceError::Forbidden => AppError::Forbidden(err.to_string()),
            CheckServiceError::NotPaused => AppError::Conflict(err.to_string()),
            CheckServiceError::Tag(tag_err) => tag_err.into(),
            CheckServiceError::DbErr(db_err) => db_err.into(),
        }
    }
}

impl From<MaintenanceError> for AppError {
    fn from(err: MaintenanceError) -> Self {
        match err {
            MaintenanceError::InvalidTitle(_)
            | MaintenanceError::InvalidTimestamp(_)
            | MaintenanceError::InvalidInterval
            | MaintenanceError::DurationTooLong
            | MaintenanceError::OverlappingWindow => AppError::InvalidInput(err.to_string()),
            MaintenanceError::TooManyWindows | MaintenanceError::Forbidden => {
                AppError::Forbidden(err.to_string())
            }
            MaintenanceError::NotFound => AppError::NotFound(err.to_string()),
            MaintenanceError::DbErr(db_err) => db_err.into(),
        }
    }
}

impl From<BulkActionError> for AppError {
    fn from(err: BulkActionError) -> Self {
        match err {
            BulkActionError::InvalidAction
            | BulkActionError::ChecksNotList
            | BulkActionError::EmptyChecks
            | BulkActionError::TooManyChecks
            | BulkActionError::InvalidCheckId
            | BulkActionError::TagsRequired => AppError::InvalidInput(err.to_string()),
            BulkActionError::Tag(tag_err) => tag_err.into(),
            BulkActionError::CheckNotFound(_) => AppError::NotFound(err.to_string()),
            BulkActionError::Forbidden(_) => AppError::Forbidden(err.to_string()),
            BulkActionError::DbErr(db_err) => db_err.into(),
        }
    }
}
