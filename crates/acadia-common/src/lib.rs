//! Acadia Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the Acadia workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Acadia workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing configuration and initialization
//! - **Types**: Shared domain enums (roles, entity status)

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{AcadiaError, Result};
pub use types::{EntityStatus, Role};
