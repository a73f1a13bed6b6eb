pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateCourseCommand, CreateCourseError, CreateCourseResponse};
pub use delete::{DeleteCourseCommand, DeleteCourseError, DeleteCourseResponse};
pub use update::{UpdateCourseCommand, UpdateCourseError, UpdateCourseResponse};
