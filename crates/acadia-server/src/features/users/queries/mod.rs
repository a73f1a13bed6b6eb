pub mod get;
pub mod list;

pub use get::{GetUserError, GetUserQuery, UserResponse};
pub use list::{ListUsersError, ListUsersQuery};
