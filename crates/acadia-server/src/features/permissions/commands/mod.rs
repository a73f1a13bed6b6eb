pub mod assign;
pub mod create;

pub use assign::{AssignPermissionsCommand, AssignPermissionsError, AssignPermissionsResponse};
pub use create::{CreatePermissionCommand, CreatePermissionError, CreatePermissionResponse};
