//! Announcement API routes
//!
//! - `POST /api/v1/businesses/:business_id/announcements` - Post an announcement
//! - `GET /api/v1/businesses/:business_id/announcements` - List announcements
//! - `GET /api/v1/announcements/:id` - Get an announcement
//! - `PUT /api/v1/announcements/:id` - Update an announcement
//! - `DELETE /api/v1/announcements/:id` - Soft delete an announcement

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
    CreateAnnouncementCommand, CreateAnnouncementError, DeleteAnnouncementCommand,
    DeleteAnnouncementError, UpdateAnnouncementCommand, UpdateAnnouncementError,
};
use super::queries::{
    GetAnnouncementError, GetAnnouncementQuery, ListAnnouncementsError, ListAnnouncementsQuery,
};

/// Routes mounted under `/businesses/:business_id/announcements`.
pub fn business_announcements_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_announcement))
        .route("/", get(list_announcements))
}

/// Routes mounted under `/announcements`.
pub fn announcements_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_announcement))
        .route("/:id", put(update_announcement))
        .route("/:id", delete(delete_announcement))
}

#[tracing::instrument(skip(pool, auth, command), fields(business_id = %business_id))]
async fn create_announcement(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(business_id): Path<Uuid>,
    Json(mut command): Json<CreateAnnouncementCommand>,
) -> Result<Response, AnnouncementApiError> {
    command.business_id = business_id;
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(announcement_id = %response.id, "Announcement posted via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Announcement created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query), fields(business_id = %business_id))]
async fn list_announcements(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(mut query): Query<ListAnnouncementsQuery>,
) -> Result<Response, AnnouncementApiError> {
    query.business_id = business_id;
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Announcements retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(announcement_id = %id))]
async fn get_announcement(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AnnouncementApiError> {
    let query = GetAnnouncementQuery { id, auth };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Announcement retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(announcement_id = %id))]
async fn update_announcement(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateAnnouncementCommand>,
) -> Result<Response, AnnouncementApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!("Announcement updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Announcement updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(announcement_id = %id))]
async fn delete_announcement(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AnnouncementApiError> {
    let command = DeleteAnnouncementCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!("Announcement deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Announcement deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AnnouncementApiError {
    Create(CreateAnnouncementError),
    Update(UpdateAnnouncementError),
    Delete(DeleteAnnouncementError),
    Get(GetAnnouncementError),
    List(ListAnnouncementsError),
}

impl From<CreateAnnouncementError> for AnnouncementApiError {
    fn from(err: CreateAnnouncementError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateAnnouncementError> for AnnouncementApiError {
    fn from(err: UpdateAnnouncementError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteAnnouncementError> for AnnouncementApiError {
    fn from(err: DeleteAnnouncementError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetAnnouncementError> for AnnouncementApiError {
    fn from(err: GetAnnouncementError) -> Self {
        Self::Get(err)
    }
}

impl From<ListAnnouncementsError> for AnnouncementApiError {
    fn from(err: ListAnnouncementsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for AnnouncementApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreateAnnouncementError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateAnnouncementError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateAnnouncementError::Access(e) => return AppError::from(e).into_response(),
                CreateAnnouncementError::Database(_) => return database_error(&err),
            },
            Self::Update(err) => match err {
                UpdateAnnouncementError::NoFieldsToUpdate
                | UpdateAnnouncementError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateAnnouncementError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateAnnouncementError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                UpdateAnnouncementError::Access(e) => return AppError::from(e).into_response(),
                UpdateAnnouncementError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteAnnouncementError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteAnnouncementError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                DeleteAnnouncementError::Access(e) => return AppError::from(e).into_response(),
                DeleteAnnouncementError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetAnnouncementError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                GetAnnouncementError::Access(e) => return AppError::from(e).into_response(),
                GetAnnouncementError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListAnnouncementsError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListAnnouncementsError::Access(e) => return AppError::from(e).into_response(),
                ListAnnouncementsError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in announcements API: {}", err);
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
    fn test_role_required_maps_to_403() {
        let response =
            AnnouncementApiError::Create(CreateAnnouncementError::RoleRequired).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_announcement_maps_to_404() {
        let response =
            AnnouncementApiError::Get(GetAnnouncementError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
