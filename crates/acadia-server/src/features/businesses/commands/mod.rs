pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateBusinessCommand, CreateBusinessError, CreateBusinessResponse};
pub use delete::{DeleteBusinessCommand, DeleteBusinessError, DeleteBusinessResponse};
pub use update::{UpdateBusinessCommand, UpdateBusinessError, UpdateBusinessResponse};
