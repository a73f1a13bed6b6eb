//! Courses feature
//!
//! Courses nest under exams. Fetching a course through an exam it does not
//! belong to is a 404, not a 403: the course simply does not exist in that
//! exam.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{courses_routes, exam_courses_routes};
