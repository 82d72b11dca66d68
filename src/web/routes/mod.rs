use axum::Router;
use std::sync::Arc;
use uuid::Uuid;

use crate::web::AppState;

pub mod bulk_routes;
pub mod check_routes;
pub mod maintenance_routes;
pub mod tag_routes;

/// Every route served under a version prefix. Paths keep their trailing slash.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(check_routes::create_checks_router())
        .merge(bulk_routes::create_bulk_router())
        .merge(tag_routes::create_tags_router())
        .merge(maintenance_routes::create_maintenance_router())
}

/// Path codes that are not UUIDs cannot match any row, so they are reported as missing.
pub(crate) fn parse_code(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
