//! Acadia Server Library
//!
//! Multi-tenant educational administration backend.
//!
//! # Overview
//!
//! The Acadia server exposes a REST API for businesses (tenants) to manage
//! exams, courses, subjects, batches, enrolled users, uploaded content,
//! announcements, and fine-grained permission assignments on top of coarse
//! role-based access control.
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)**
//! layout: each feature is a vertical slice with its own commands (write
//! operations), queries (read operations), and routes.
//!
//! Authorization is hierarchical: every resource resolves its owning business
//! by walking foreign keys (content -> batch -> course -> exam -> business),
//! and a caller is permitted when it is a SUPERADMIN or its business matches
//! the resolved one. Authentication is a locally-verified Bearer JWT; the
//! authenticated caller travels as an explicit [`auth::AuthUser`] parameter,
//! never as ambient state.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extraction
//! - **SQLx**: PostgreSQL access and migrations
//! - **Tower / tower-http**: middleware (tracing, CORS, compression)

pub mod api;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod features;
pub mod middleware;
pub mod storage;

// Re-export commonly used types
pub use api::response::{ApiResponse, AppError, ErrorResponse};
