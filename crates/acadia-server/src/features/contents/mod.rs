//! Contents feature: uploaded files attached to batches
//!
//! Bytes live in S3-compatible storage; the `contents` row carries the
//! metadata (filename, content type, size, sha256 checksum, storage key).
//! Downloads are short-lived presigned GET URLs, so file bytes never stream
//! through the API server.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{batch_contents_routes, contents_routes};
