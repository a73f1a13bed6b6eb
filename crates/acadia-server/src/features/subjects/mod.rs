//! Subjects feature
//!
//! Subjects nest under courses, mirroring the course/exam relationship one
//! level down.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{course_subjects_routes, subjects_routes};
