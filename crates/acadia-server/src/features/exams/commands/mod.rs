pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateExamCommand, CreateExamError, CreateExamResponse};
pub use delete::{DeleteExamCommand, DeleteExamError, DeleteExamResponse};
pub use update::{UpdateExamCommand, UpdateExamError, UpdateExamResponse};
