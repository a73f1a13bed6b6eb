//! User API routes
//!
//! Nested under a business for creation and listing, flat for single-user
//! operations:
//!
//! - `POST /api/v1/businesses/:business_id/users` - Create a user
//! - `GET /api/v1/businesses/:business_id/users` - List users (filters: role, status)
//! - `GET /api/v1/users/:id` - Get a user
//! - `PUT /api/v1/users/:id` - Update a user
//! - `DELETE /api/v1/users/:id` - Soft delete a user

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError, ErrorResponse};
use crate::auth::AuthUser;
use crate::features::AppState;

use super::commands::{
    CreateUserCommand, CreateUserError, DeleteUserCommand, DeleteUserError, UpdateUserCommand,
    UpdateUserError,
};
use super::queries::{GetUserError, GetUserQuery, ListUsersError, ListUsersQuery};

/// Routes mounted under `/businesses/:business_id/users`.
pub fn business_users_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/", get(list_users))
}

/// Routes mounted under `/users`.
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(delete_user))
}

#[tracing::instrument(skip(pool, auth, command), fields(business_id = %business_id))]
async fn create_user(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(business_id): Path<Uuid>,
    Json(mut command): Json<CreateUserCommand>,
) -> Result<Response, UserApiError> {
    command.business_id = business_id;
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(user_id = %response.id, "User created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query), fields(business_id = %business_id))]
async fn list_users(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(mut query): Query<ListUsersQuery>,
) -> Result<Response, UserApiError> {
    query.business_id = business_id;
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Users retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(user_id = %id))]
async fn get_user(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, UserApiError> {
    let query = GetUserQuery { id, auth };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(user_id = %id))]
async fn update_user(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateUserCommand>,
) -> Result<Response, UserApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!(user_id = %response.id, "User updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(user_id = %id))]
async fn delete_user(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, UserApiError> {
    let command = DeleteUserCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!(user_id = %response.id, "User deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum UserApiError {
    Create(CreateUserError),
    Update(UpdateUserError),
    Delete(DeleteUserError),
    Get(GetUserError),
    List(ListUsersError),
}

impl From<CreateUserError> for UserApiError {
    fn from(err: CreateUserError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateUserError> for UserApiError {
    fn from(err: UpdateUserError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteUserError> for UserApiError {
    fn from(err: DeleteUserError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetUserError> for UserApiError {
    fn from(err: GetUserError) -> Self {
        Self::Get(err)
    }
}

impl From<ListUsersError> for UserApiError {
    fn from(err: ListUsersError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreateUserError::NameValidation(_)
                | CreateUserError::EmailValidation(_)
                | CreateUserError::MobileValidation(_)
                | CreateUserError::WeakPassword
                | CreateUserError::SuperadminRole => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateUserError::RoleRequired | CreateUserError::RoleEscalation => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateUserError::Duplicate => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
                CreateUserError::Access(e) => return AppError::from(e).into_response(),
                CreateUserError::Password(_) | CreateUserError::Database(_) => {
                    return internal_error(&err)
                },
            },
            Self::Update(err) => match err {
                UpdateUserError::NoFieldsToUpdate
                | UpdateUserError::NameValidation(_)
                | UpdateUserError::EmailValidation(_)
                | UpdateUserError::MobileValidation(_)
                | UpdateUserError::SuperadminRole => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateUserError::RoleRequired | UpdateUserError::RoleEscalation => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateUserError::Duplicate => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
                UpdateUserError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                UpdateUserError::Access(e) => return AppError::from(e).into_response(),
                UpdateUserError::Database(_) => return internal_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteUserError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteUserError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                DeleteUserError::Access(e) => return AppError::from(e).into_response(),
                DeleteUserError::Database(_) => return internal_error(&err),
            },
            Self::Get(err) => match err {
                GetUserError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                GetUserError::Access(e) => return AppError::from(e).into_response(),
                GetUserError::Database(_) => return internal_error(&err),
            },
            Self::List(err) => match err {
                ListUsersError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListUsersError::Access(e) => return AppError::from(e).into_response(),
                ListUsersError::Database(_) => return internal_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn internal_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Internal error in users API: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_409() {
        let response = UserApiError::Create(CreateUserError::Duplicate).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_role_escalation_maps_to_403() {
        let response = UserApiError::Create(CreateUserError::RoleEscalation).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
