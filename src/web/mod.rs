use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::web::middleware::{auth, preflight};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

/// Version prefixes that all serve the same API.
pub const API_VERSIONS: [&str; 3] = ["/api/v1", "/api/v2", "/api/v3"];

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(db_pool: DatabaseConnection) -> Router {
    let app_state = Arc::new(AppState { db_pool });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(vec![
            header::CONTENT_TYPE,
            auth::API_KEY_HEADER,
        ])
        .max_age(std::time::Duration::from_secs(600));

    let protected = routes::api_router()
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth));

    let mut router = Router::new().route("/api/health", get(health_check_handler));
    for prefix in API_VERSIONS {
        router = router.nest(prefix, protected.clone());
    }

    // The last layer added runs first: preflight wraps CORS.
    router
        .layer(cors)
        .layer(axum_middleware::from_fn(preflight::preflight))
        .with_state(app_state)
}
