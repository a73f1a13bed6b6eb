pub mod get;
pub mod list;

pub use get::{GetSubjectError, GetSubjectQuery, SubjectResponse};
pub use list::{ListSubjectsError, ListSubjectsQuery};
