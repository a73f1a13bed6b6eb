//! Permissions feature: named capability grants
//!
//! Permissions form a global catalog keyed by a unique code. Users hold a
//! set of grants in `role_permissions`; assignment replaces the whole set
//! atomically so a retried request converges on the same state.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{permissions_routes, user_permissions_routes};
