//! Users feature: tenant-scoped account management
//!
//! Accounts carry a role and a bcrypt password hash. Email and mobile are
//! unique per deployment; duplicates surface as 409s.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{business_users_routes, users_routes};
