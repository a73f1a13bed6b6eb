pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateSubjectCommand, CreateSubjectError, CreateSubjectResponse};
pub use delete::{DeleteSubjectCommand, DeleteSubjectError, DeleteSubjectResponse};
pub use update::{UpdateSubjectCommand, UpdateSubjectError, UpdateSubjectResponse};
