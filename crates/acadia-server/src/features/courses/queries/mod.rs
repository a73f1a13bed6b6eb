pub mod get;
pub mod list;

pub use get::{CourseResponse, GetCourseError, GetCourseQuery};
pub use list::{ListCoursesError, ListCoursesQuery};
