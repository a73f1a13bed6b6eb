//! Announcements feature: business-wide notices
//!
//! Announcements belong to a business and are visible to every user inside
//! that tenant. Admins create and retire them; they soft delete like the
//! catalog entities.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{announcements_routes, business_announcements_routes};
