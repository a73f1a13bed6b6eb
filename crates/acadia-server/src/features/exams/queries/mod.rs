pub mod get;
pub mod list;

pub use get::{ExamResponse, GetExamError, GetExamQuery};
pub use list::{ListExamsError, ListExamsQuery};
