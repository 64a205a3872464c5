//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod entity;
mod enumerations;
mod form;
mod notification;
mod task;
pub mod timestamp;
mod user;
mod user_tasks;
mod user_workspaces;
mod workspace;

pub use catalog::{ENTITY_ROUTES, EntityRoute, find_route};
pub use entity::Entity;
pub use enumerations::{NotificationStatus, Priority, Privilege, Status};
pub use form::{FieldKind, FieldSpec, FormSchema};
pub use notification::Notification;
pub use task::Task;
pub use user::User;
pub use user_tasks::UserTasks;
pub use user_workspaces::UserWorkspaces;
pub use workspace::Workspace;
