//! Exams feature
//!
//! Exams sit directly under a business. Names must be unique among ACTIVE
//! exams within one business; the pre-check and the write run inside a single
//! SERIALIZABLE transaction so the explicit duplicate-name error wins over a
//! bare unique-violation. A partial unique index on the table backstops the
//! check.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{business_exams_routes, exams_routes};
