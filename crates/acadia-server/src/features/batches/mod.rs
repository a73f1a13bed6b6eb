//! Batches feature
//!
//! A batch is a cohort under a course, with optional start/end dates.
//! Enrollment is a hard-deleted join table (`batch_users`); adding the same
//! user twice is a no-op.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{batches_routes, course_batches_routes};
