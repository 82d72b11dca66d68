//! SeaORM entities backing the check management API.

pub mod project;
pub mod check;
pub mod maintenance_window;
pub mod flip;

pub mod prelude {
    pub use super::project::Entity as Project;
    pub use super::project::Model as ProjectModel;
    pub use super::project::ActiveModel as ProjectActiveModel;
    pub use super::project::Column as ProjectColumn;

    pub use super::check::Entity as Check;
    pub use super::check::Model as CheckModel;
    pub use super::check::ActiveModel as CheckActiveModel;
    pub use super::check::Column as CheckColumn;

    pub use super::maintenance_window::Entity as MaintenanceWindow;
    pub use super::maintenance_window::Model as MaintenanceWindowModel;
    pub use super::maintenance_window::ActiveModel as MaintenanceWindowActiveModel;
    pub use super::maintenance_window::Column as MaintenanceWindowColumn;

    pub use super::flip::Entity as Flip;
    pub use super::flip::Model as FlipModel;
    pub use super::flip::ActiveModel as FlipActiveModel;
    pub use super::flip::Column as FlipColumn;
}
