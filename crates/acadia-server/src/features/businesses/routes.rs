//! Business API routes
//!
//! - `POST /api/v1/businesses` - Create a business (SUPERADMIN)
//! - `GET /api/v1/businesses` - List businesses (scoped to caller's tenant)
//! - `GET /api/v1/businesses/:id` - Get a business
//! - `PUT /api/v1/businesses/:id` - Update a business
//! - `DELETE /api/v1/businesses/:id` - Soft delete a business

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
    CreateBusinessCommand, CreateBusinessError, DeleteBusinessCommand, DeleteBusinessError,
    UpdateBusinessCommand, UpdateBusinessError,
};
use super::queries::{GetBusinessError, GetBusinessQuery, ListBusinessesError, ListBusinessesQuery};

pub fn businesses_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_business))
        .route("/", get(list_businesses))
        .route("/:id", get(get_business))
        .route("/:id", put(update_business))
        .route("/:id", delete(delete_business))
}

#[tracing::instrument(skip(pool, auth, command), fields(name = %command.name))]
async fn create_business(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(mut command): Json<CreateBusinessCommand>,
) -> Result<Response, BusinessApiError> {
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(business_id = %response.id, "Business created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Business created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query))]
async fn list_businesses(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(mut query): Query<ListBusinessesQuery>,
) -> Result<Response, BusinessApiError> {
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Businesses retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(business_id = %id))]
async fn get_business(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, BusinessApiError> {
    let query = GetBusinessQuery { id, auth };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Business retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(business_id = %id))]
async fn update_business(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateBusinessCommand>,
) -> Result<Response, BusinessApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!(business_id = %response.id, "Business updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Business updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(business_id = %id))]
async fn delete_business(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, BusinessApiError> {
    let command = DeleteBusinessCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!(business_id = %response.id, "Business deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Business deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum BusinessApiError {
    Create(CreateBusinessError),
    Update(UpdateBusinessError),
    Delete(DeleteBusinessError),
    Get(GetBusinessError),
    List(ListBusinessesError),
}

impl From<CreateBusinessError> for BusinessApiError {
    fn from(err: CreateBusinessError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateBusinessError> for BusinessApiError {
    fn from(err: UpdateBusinessError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteBusinessError> for BusinessApiError {
    fn from(err: DeleteBusinessError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetBusinessError> for BusinessApiError {
    fn from(err: GetBusinessError) -> Self {
        Self::Get(err)
    }
}

impl From<ListBusinessesError> for BusinessApiError {
    fn from(err: ListBusinessesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for BusinessApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(ref err) => match err {
                CreateBusinessError::NameValidation(_)
                | CreateBusinessError::EmailValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateBusinessError::Forbidden => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateBusinessError::Database(_) => return database_error(err),
            },
            Self::Update(err) => match err {
                UpdateBusinessError::NoFieldsToUpdate
                | UpdateBusinessError::NameValidation(_)
                | UpdateBusinessError::EmailValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateBusinessError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateBusinessError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                UpdateBusinessError::Access(e) => return AppError::from(e).into_response(),
                UpdateBusinessError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteBusinessError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteBusinessError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                DeleteBusinessError::Access(e) => return AppError::from(e).into_response(),
                DeleteBusinessError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetBusinessError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                GetBusinessError::Access(e) => return AppError::from(e).into_response(),
                GetBusinessError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListBusinessesError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListBusinessesError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in businesses API: {}", err);
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
    fn test_forbidden_create_maps_to_403() {
        let response = BusinessApiError::Create(CreateBusinessError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = BusinessApiError::Get(GetBusinessError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
