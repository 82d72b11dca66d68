//! Database access for the check management API.
//!
//! Each sub-module owns one domain area. Public functions are re-exported here
//! so handlers can call them as `crate::db::services::*`.

pub mod project_service;
pub mod check_service;
pub mod tag_service;
pub mod maintenance_service;
pub mod bulk_action_service;

pub use project_service::*;
pub use check_service::*;
pub use tag_service::*;
pub use maintenance_service::*;
pub use bulk_action_service::*;
