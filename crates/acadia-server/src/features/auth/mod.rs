//! Authentication feature: credential login issuing Bearer tokens

pub mod commands;
pub mod routes;

pub use routes::auth_routes;
