//! Feature modules implementing the Acadia API
//!
//! This module contains all feature slices following the CQRS (Command Query
//! Responsibility Segregation) pattern. Each feature is organized as a
//! vertical slice with its own commands, queries, and routes.
//!
//! # Features
//!
//! - **auth**: Login and token issuance
//! - **businesses**: Tenant management
//! - **users**: Accounts, roles, and profiles within a business
//! - **exams**: Exams with per-business active-name uniqueness
//! - **courses**: Courses under exams
//! - **subjects**: Subjects under courses
//! - **batches**: Batches under courses, with user enrollment
//! - **contents**: File upload/download via S3-compatible storage
//! - **announcements**: Business-wide notices
//! - **permissions**: Permission catalog and per-user grants
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement the mediator pattern using the `mediator`
//! crate, enabling clean separation of concerns and easy testing.

pub mod announcements;
pub mod auth;
pub mod batches;
pub mod businesses;
pub mod contents;
pub mod courses;
pub mod exams;
pub mod permissions;
pub mod shared;
pub mod subjects;
pub mod users;

use axum::extract::FromRef;
use axum::Router;

use crate::config::AuthConfig;
use crate::storage::Storage;

/// Shared state for all feature routes
///
/// Substates (pool, storage, auth config) are handed to extractors through
/// `FromRef`, so a handler asks for exactly what it needs.
#[derive(Clone, FromRef)]
pub struct AppState {
    /// PostgreSQL connection pool for database operations
    pub db: sqlx::PgPool,
    /// S3-compatible storage backend for content operations
    pub storage: Storage,
    /// Token signing configuration
    pub auth: AuthConfig,
}

/// Creates the main API router with all feature routes mounted
///
/// `/auth` is the only unauthenticated prefix; everything else sits behind
/// the Bearer-token middleware. Nested resource prefixes reuse `:id` for the
/// parent segment because the router requires one parameter name per
/// position.
pub fn router(state: AppState) -> Router<()> {
    let protected = Router::new()
        .nest("/businesses", businesses::businesses_routes())
        .nest("/businesses/:id/users", users::business_users_routes())
        .nest("/businesses/:id/exams", exams::business_exams_routes())
        .nest(
            "/businesses/:id/announcements",
            announcements::business_announcements_routes(),
        )
        .nest("/users", users::users_routes())
        .nest("/users/:id/permissions", permissions::user_permissions_routes())
        .nest("/exams", exams::exams_routes())
        .nest("/exams/:id/courses", courses::exam_courses_routes())
        .nest("/courses", courses::courses_routes())
        .nest("/courses/:id/subjects", subjects::course_subjects_routes())
        .nest("/courses/:id/batches", batches::course_batches_routes())
        .nest("/subjects", subjects::subjects_routes())
        .nest("/batches", batches::batches_routes())
        .nest("/batches/:id/contents", contents::batch_contents_routes())
        .nest("/contents", contents::contents_routes())
        .nest("/announcements", announcements::announcements_routes())
        .nest("/permissions", permissions::permissions_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.auth.clone(),
            crate::auth::require_auth,
        ));

    Router::new()
        .nest("/auth", auth::auth_routes())
        .merge(protected)
        .with_state(state)
}
