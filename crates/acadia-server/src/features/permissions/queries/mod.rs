pub mod list;
pub mod list_user;

pub use list::{ListPermissionsError, ListPermissionsQuery, PermissionResponse};
pub use list_user::{ListUserPermissionsError, ListUserPermissionsQuery};
