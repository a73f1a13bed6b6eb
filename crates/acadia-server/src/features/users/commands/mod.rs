pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateUserCommand, CreateUserError, CreateUserResponse};
pub use delete::{DeleteUserCommand, DeleteUserError, DeleteUserResponse};
pub use update::{UpdateUserCommand, UpdateUserError, UpdateUserResponse};
