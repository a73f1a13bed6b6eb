//! Content API routes
//!
//! - `POST /api/v1/batches/:batch_id/contents` - Upload a file (multipart)
//! - `GET /api/v1/batches/:batch_id/contents` - List contents of a batch
//! - `GET /api/v1/contents/:id` - Get content metadata
//! - `GET /api/v1/contents/:id/download` - Get a presigned download URL
//! - `DELETE /api/v1/contents/:id` - Delete content and its stored object

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError, ErrorResponse};
use crate::auth::AuthUser;
use crate::features::AppState;
use crate::storage::Storage;

use super::commands::{
    DeleteContentCommand, DeleteContentError, UploadContentCommand, UploadContentError,
    MAX_UPLOAD_BYTES,
};
use super::queries::{
    DownloadContentError, DownloadContentQuery, GetContentError, GetContentQuery,
    ListContentsError, ListContentsQuery,
};

/// Routes mounted under `/batches/:batch_id/contents`.
pub fn batch_contents_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_content))
        .route("/", get(list_contents))
        // The multipart body carries the file itself, so the limit is the
        // upload cap plus headroom for the other fields.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
}

/// Routes mounted under `/contents`.
pub fn contents_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_content))
        .route("/:id", delete(delete_content))
        .route("/:id/download", get(download_content))
}

#[tracing::instrument(skip(pool, storage, auth, multipart), fields(batch_id = %batch_id))]
async fn upload_content(
    State(pool): State<PgPool>,
    State(storage): State<Storage>,
    auth: AuthUser,
    Path(batch_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, ContentApiError> {
    let command = build_upload_command(batch_id, auth, multipart).await?;

    let response = super::commands::upload::handle(pool, storage, command).await?;

    tracing::info!(content_id = %response.id, "Content uploaded via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Content uploaded", response)),
    )
        .into_response())
}

/// Pulls `title` and `file` fields out of the multipart body.
async fn build_upload_command(
    batch_id: Uuid,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<UploadContentCommand, ContentApiError> {
    let mut title = None;
    let mut file_name = None;
    let mut content_type = None;
    let mut data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ContentApiError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ContentApiError::Multipart(e.to_string()))?,
                );
            },
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ContentApiError::Multipart(e.to_string()))?,
                );
            },
            // Unknown fields are ignored rather than rejected.
            _ => {},
        }
    }

    Ok(UploadContentCommand {
        batch_id,
        title: title.unwrap_or_default(),
        file_name: file_name.unwrap_or_default(),
        content_type,
        data: data.map(|b| b.to_vec()).unwrap_or_default(),
        auth,
    })
}

#[tracing::instrument(skip(pool, auth, query), fields(batch_id = %batch_id))]
async fn list_contents(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(batch_id): Path<Uuid>,
    Query(mut query): Query<ListContentsQuery>,
) -> Result<Response, ContentApiError> {
    query.batch_id = batch_id;
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Contents retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(content_id = %id))]
async fn get_content(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ContentApiError> {
    let query = GetContentQuery { id, auth };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Content retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, storage, auth), fields(content_id = %id))]
async fn download_content(
    State(pool): State<PgPool>,
    State(storage): State<Storage>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ContentApiError> {
    let query = DownloadContentQuery { id, auth };

    let response = super::queries::download::handle(pool, storage, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Download URL generated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, storage, auth), fields(content_id = %id))]
async fn delete_content(
    State(pool): State<PgPool>,
    State(storage): State<Storage>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ContentApiError> {
    let command = DeleteContentCommand { id, auth };

    let response = super::commands::delete::handle(pool, storage, command).await?;

    tracing::info!("Content deleted via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Content deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum ContentApiError {
    Multipart(String),
    Upload(UploadContentError),
    Delete(DeleteContentError),
    Get(GetContentError),
    List(ListContentsError),
    Download(DownloadContentError),
}

impl From<UploadContentError> for ContentApiError {
    fn from(err: UploadContentError) -> Self {
        Self::Upload(err)
    }
}

impl From<DeleteContentError> for ContentApiError {
    fn from(err: DeleteContentError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetContentError> for ContentApiError {
    fn from(err: GetContentError) -> Self {
        Self::Get(err)
    }
}

impl From<ListContentsError> for ContentApiError {
    fn from(err: ListContentsError) -> Self {
        Self::List(err)
    }
}

impl From<DownloadContentError> for ContentApiError {
    fn from(err: DownloadContentError) -> Self {
        Self::Download(err)
    }
}

impl IntoResponse for ContentApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Multipart(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Invalid multipart body: {}", msg),
            ),
            Self::Upload(err) => match err {
                UploadContentError::TitleValidation(_) | UploadContentError::MissingFile => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UploadContentError::TooLarge => {
                    (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", err.to_string())
                },
                UploadContentError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UploadContentError::Access(e) => return AppError::from(e).into_response(),
                UploadContentError::Storage(_) => return storage_error(&err),
                UploadContentError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteContentError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteContentError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                DeleteContentError::Access(e) => return AppError::from(e).into_response(),
                DeleteContentError::Storage(_) => return storage_error(&err),
                DeleteContentError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetContentError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                GetContentError::Access(e) => return AppError::from(e).into_response(),
                GetContentError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListContentsError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListContentsError::Access(e) => return AppError::from(e).into_response(),
                ListContentsError::Database(_) => return database_error(&err),
            },
            Self::Download(err) => match err {
                DownloadContentError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                DownloadContentError::Access(e) => return AppError::from(e).into_response(),
                DownloadContentError::Storage(_) => return storage_error(&err),
                DownloadContentError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in contents API: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")),
    )
        .into_response()
}

fn storage_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Storage error in contents API: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversize_upload_maps_to_413() {
        let response = ContentApiError::Upload(UploadContentError::TooLarge).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_multipart_error_maps_to_400() {
        let response = ContentApiError::Multipart("truncated body".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_content_maps_to_404() {
        let response = ContentApiError::Get(GetContentError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
