pub mod bulk_models;
pub mod check_models;
pub mod maintenance_models;

/// Project resolved from the request's API key, passed on as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedProject {
    pub id: i32,
}
