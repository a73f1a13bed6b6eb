pub mod get;
pub mod list_users;

pub use get::{BatchResponse, GetBatchError, GetBatchQuery};
pub use list_users::{EnrolledUser, ListBatchUsersError, ListBatchUsersQuery};
