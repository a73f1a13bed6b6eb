//! Businesses feature: tenant management
//!
//! A business is the tenant root; every exam, course, subject, batch,
//! content, user and announcement transitively belongs to one. Creation is
//! reserved to SUPERADMIN; everything else is tenant-scoped.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::businesses_routes;
