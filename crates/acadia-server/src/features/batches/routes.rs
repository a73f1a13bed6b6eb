//! Batch API routes
//!
//! - `POST /api/v1/courses/:course_id/batches` - Create a batch
//! - `GET /api/v1/batches/:id` - Get a batch
//! - `PUT /api/v1/batches/:id` - Update a batch
//! - `DELETE /api/v1/batches/:id` - Soft delete a batch
//! - `POST /api/v1/batches/:id/users` - Enroll users (idempotent)
//! - `GET /api/v1/batches/:id/users` - List enrolled users
//! - `DELETE /api/v1/batches/:id/users/:user_id` - Unenroll a user

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
    CreateBatchCommand, CreateBatchError, DeleteBatchCommand, DeleteBatchError, EnrollUsersCommand,
    EnrollUsersError, UnenrollUserCommand, UnenrollUserError, UpdateBatchCommand, UpdateBatchError,
};
use super::queries::{
    GetBatchError, GetBatchQuery, ListBatchUsersError, ListBatchUsersQuery,
};

/// Routes mounted under `/courses/:course_id/batches`.
pub fn course_batches_routes() -> Router<AppState> {
    Router::new().route("/", post(create_batch))
}

/// Routes mounted under `/batches`.
pub fn batches_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_batch))
        .route("/:id", put(update_batch))
        .route("/:id", delete(delete_batch))
        .route("/:id/users", post(enroll_users))
        .route("/:id/users", get(list_batch_users))
        .route("/:id/users/:user_id", delete(unenroll_user))
}

#[tracing::instrument(skip(pool, auth, command), fields(course_id = %course_id))]
async fn create_batch(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(mut command): Json<CreateBatchCommand>,
) -> Result<Response, BatchApiError> {
    command.course_id = course_id;
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(batch_id = %response.id, "Batch created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Batch created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(batch_id = %id))]
async fn get_batch(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, BatchApiError> {
    let query = GetBatchQuery { id, auth };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Batch retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(batch_id = %id))]
async fn update_batch(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateBatchCommand>,
) -> Result<Response, BatchApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!(batch_id = %response.id, "Batch updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Batch updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(batch_id = %id))]
async fn delete_batch(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, BatchApiError> {
    let command = DeleteBatchCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!(batch_id = %response.id, "Batch deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Batch deleted", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(batch_id = %id))]
async fn enroll_users(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<EnrollUsersCommand>,
) -> Result<Response, BatchApiError> {
    command.batch_id = id;
    command.auth = auth;

    let response = super::commands::enroll::handle(pool, command).await?;

    tracing::info!(enrolled = response.enrolled, "Users enrolled via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Users enrolled", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query), fields(batch_id = %id))]
async fn list_batch_users(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(mut query): Query<ListBatchUsersQuery>,
) -> Result<Response, BatchApiError> {
    query.batch_id = id;
    query.auth = auth;

    let response = super::queries::list_users::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Enrolled users retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(batch_id = %batch_id, user_id = %user_id))]
async fn unenroll_user(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path((batch_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, BatchApiError> {
    let command = UnenrollUserCommand {
        batch_id,
        user_id,
        auth,
    };

    let response = super::commands::unenroll::handle(pool, command).await?;

    tracing::info!("User unenrolled via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User unenrolled", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum BatchApiError {
    Create(CreateBatchError),
    Update(UpdateBatchError),
    Delete(DeleteBatchError),
    Enroll(EnrollUsersError),
    Unenroll(UnenrollUserError),
    Get(GetBatchError),
    ListUsers(ListBatchUsersError),
}

impl From<CreateBatchError> for BatchApiError {
    fn from(err: CreateBatchError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateBatchError> for BatchApiError {
    fn from(err: UpdateBatchError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteBatchError> for BatchApiError {
    fn from(err: DeleteBatchError) -> Self {
        Self::Delete(err)
    }
}

impl From<EnrollUsersError> for BatchApiError {
    fn from(err: EnrollUsersError) -> Self {
        Self::Enroll(err)
    }
}

impl From<UnenrollUserError> for BatchApiError {
    fn from(err: UnenrollUserError) -> Self {
        Self::Unenroll(err)
    }
}

impl From<GetBatchError> for BatchApiError {
    fn from(err: GetBatchError) -> Self {
        Self::Get(err)
    }
}

impl From<ListBatchUsersError> for BatchApiError {
    fn from(err: ListBatchUsersError) -> Self {
        Self::ListUsers(err)
    }
}

impl IntoResponse for BatchApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreateBatchError::NameValidation(_) | CreateBatchError::InvalidDateRange => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateBatchError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateBatchError::Access(e) => return AppError::from(e).into_response(),
                CreateBatchError::Database(_) => return database_error(&err),
            },
            Self::Update(err) => match err {
                UpdateBatchError::NoFieldsToUpdate
                | UpdateBatchError::NameValidation(_)
                | UpdateBatchError::InvalidDateRange => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateBatchError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateBatchError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                UpdateBatchError::Access(e) => return AppError::from(e).into_response(),
                UpdateBatchError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteBatchError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteBatchError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                DeleteBatchError::Access(e) => return AppError::from(e).into_response(),
                DeleteBatchError::Database(_) => return database_error(&err),
            },
            Self::Enroll(err) => match err {
                EnrollUsersError::NoUsers => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                EnrollUsersError::RoleRequired | EnrollUsersError::CrossTenantUser => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                EnrollUsersError::UserNotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                EnrollUsersError::Access(e) => return AppError::from(e).into_response(),
                EnrollUsersError::Database(_) => return database_error(&err),
            },
            Self::Unenroll(err) => match err {
                UnenrollUserError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UnenrollUserError::NotEnrolled => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                UnenrollUserError::Access(e) => return AppError::from(e).into_response(),
                UnenrollUserError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetBatchError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                GetBatchError::Access(e) => return AppError::from(e).into_response(),
                GetBatchError::Database(_) => return database_error(&err),
            },
            Self::ListUsers(err) => match err {
                ListBatchUsersError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListBatchUsersError::Access(e) => return AppError::from(e).into_response(),
                ListBatchUsersError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in batches API: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_tenant_enroll_maps_to_403() {
        let response = BatchApiError::Enroll(EnrollUsersError::CrossTenantUser).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unenroll_missing_maps_to_404() {
        let response = BatchApiError::Unenroll(UnenrollUserError::NotEnrolled).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
