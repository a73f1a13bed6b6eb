//! Permission API routes
//!
//! - `POST /api/v1/permissions` - Create a permission (superadmin)
//! - `GET /api/v1/permissions` - List the permission catalog
//! - `GET /api/v1/users/:user_id/permissions` - List a user's grants
//! - `PUT /api/v1/users/:user_id/permissions` - Replace a user's grants

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError, ErrorResponse};
use crate::auth::AuthUser;
use crate::features::AppState;

use super::commands::{
    AssignPermissionsCommand, AssignPermissionsError, CreatePermissionCommand,
    CreatePermissionError,
};
use super::queries::{
    ListPermissionsError, ListPermissionsQuery, ListUserPermissionsError,
    ListUserPermissionsQuery,
};

/// Routes mounted under `/permissions`.
pub fn permissions_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_permission))
        .route("/", get(list_permissions))
}

/// Routes mounted under `/users/:user_id/permissions`.
pub fn user_permissions_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_user_permissions))
        .route("/", put(assign_permissions))
}

#[tracing::instrument(skip(pool, auth, command), fields(code = %command.code))]
async fn create_permission(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(mut command): Json<CreatePermissionCommand>,
) -> Result<Response, PermissionApiError> {
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(permission_id = %response.id, "Permission created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Permission created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query))]
async fn list_permissions(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(mut query): Query<ListPermissionsQuery>,
) -> Result<Response, PermissionApiError> {
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Permissions retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(user_id = %user_id))]
async fn list_user_permissions(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Response, PermissionApiError> {
    let query = ListUserPermissionsQuery { user_id, auth };

    let response = super::queries::list_user::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User permissions retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(user_id = %user_id))]
async fn assign_permissions(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(mut command): Json<AssignPermissionsCommand>,
) -> Result<Response, PermissionApiError> {
    command.user_id = user_id;
    command.auth = auth;

    let response = super::commands::assign::handle(pool, command).await?;

    tracing::info!(granted = response.granted, "Permissions assigned via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Permissions assigned", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum PermissionApiError {
    Create(CreatePermissionError),
    Assign(AssignPermissionsError),
    List(ListPermissionsError),
    ListUser(ListUserPermissionsError),
}

impl From<CreatePermissionError> for PermissionApiError {
    fn from(err: CreatePermissionError) -> Self {
        Self::Create(err)
    }
}

impl From<AssignPermissionsError> for PermissionApiError {
    fn from(err: AssignPermissionsError) -> Self {
        Self::Assign(err)
    }
}

impl From<ListPermissionsError> for PermissionApiError {
    fn from(err: ListPermissionsError) -> Self {
        Self::List(err)
    }
}

impl From<ListUserPermissionsError> for PermissionApiError {
    fn from(err: ListUserPermissionsError) -> Self {
        Self::ListUser(err)
    }
}

impl IntoResponse for PermissionApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreatePermissionError::CodeValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreatePermissionError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreatePermissionError::DuplicateCode(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                },
                CreatePermissionError::Database(_) => return database_error(&err),
            },
            Self::Assign(err) => match err {
                AssignPermissionsError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                AssignPermissionsError::PermissionNotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                AssignPermissionsError::Access(e) => return AppError::from(e).into_response(),
                AssignPermissionsError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListPermissionsError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListPermissionsError::Database(_) => return database_error(&err),
            },
            Self::ListUser(err) => match err {
                ListUserPermissionsError::Access(e) => return AppError::from(e).into_response(),
                ListUserPermissionsError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in permissions API: {}", err);
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
    fn test_duplicate_code_maps_to_409() {
        let response = PermissionApiError::Create(CreatePermissionError::DuplicateCode(
            "contents.upload".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unknown_permission_maps_to_404() {
        let response =
            PermissionApiError::Assign(AssignPermissionsError::PermissionNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
