//! Subject API routes
//!
//! - `POST /api/v1/courses/:course_id/subjects` - Create a subject
//! - `GET /api/v1/courses/:course_id/subjects` - List subjects
//! - `GET /api/v1/courses/:course_id/subjects/:subject_id` - Get a subject (404 on course mismatch)
//! - `PUT /api/v1/subjects/:id` - Update a subject
//! - `DELETE /api/v1/subjects/:id` - Soft delete a subject

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
    CreateSubjectCommand, CreateSubjectError, DeleteSubjectCommand, DeleteSubjectError,
    UpdateSubjectCommand, UpdateSubjectError,
};
use super::queries::{GetSubjectError, GetSubjectQuery, ListSubjectsError, ListSubjectsQuery};

/// Routes mounted under `/courses/:course_id/subjects`.
pub fn course_subjects_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject))
        .route("/", get(list_subjects))
        .route("/:subject_id", get(get_subject))
}

/// Routes mounted under `/subjects`.
pub fn subjects_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", put(update_subject))
        .route("/:id", delete(delete_subject))
}

#[tracing::instrument(skip(pool, auth, command), fields(course_id = %course_id))]
async fn create_subject(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(mut command): Json<CreateSubjectCommand>,
) -> Result<Response, SubjectApiError> {
    command.course_id = course_id;
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(subject_id = %response.id, "Subject created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Subject created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query), fields(course_id = %course_id))]
async fn list_subjects(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Query(mut query): Query<ListSubjectsQuery>,
) -> Result<Response, SubjectApiError> {
    query.course_id = course_id;
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Subjects retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(course_id = %course_id, subject_id = %subject_id))]
async fn get_subject(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path((course_id, subject_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, SubjectApiError> {
    let query = GetSubjectQuery {
        course_id,
        subject_id,
        auth,
    };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Subject retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(subject_id = %id))]
async fn update_subject(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateSubjectCommand>,
) -> Result<Response, SubjectApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!(subject_id = %response.id, "Subject updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Subject updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(subject_id = %id))]
async fn delete_subject(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, SubjectApiError> {
    let command = DeleteSubjectCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!(subject_id = %response.id, "Subject deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Subject deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum SubjectApiError {
    Create(CreateSubjectError),
    Update(UpdateSubjectError),
    Delete(DeleteSubjectError),
    Get(GetSubjectError),
    List(ListSubjectsError),
}

impl From<CreateSubjectError> for SubjectApiError {
    fn from(err: CreateSubjectError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateSubjectError> for SubjectApiError {
    fn from(err: UpdateSubjectError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteSubjectError> for SubjectApiError {
    fn from(err: DeleteSubjectError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetSubjectError> for SubjectApiError {
    fn from(err: GetSubjectError) -> Self {
        Self::Get(err)
    }
}

impl From<ListSubjectsError> for SubjectApiError {
    fn from(err: ListSubjectsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for SubjectApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreateSubjectError::NameValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateSubjectError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateSubjectError::Access(e) => return AppError::from(e).into_response(),
                CreateSubjectError::Database(_) => return database_error(&err),
            },
            Self::Update(err) => match err {
                UpdateSubjectError::NoFieldsToUpdate | UpdateSubjectError::NameValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateSubjectError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateSubjectError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                UpdateSubjectError::Access(e) => return AppError::from(e).into_response(),
                UpdateSubjectError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteSubjectError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteSubjectError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                DeleteSubjectError::Access(e) => return AppError::from(e).into_response(),
                DeleteSubjectError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetSubjectError::NotFoundInCourse => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                GetSubjectError::Access(e) => return AppError::from(e).into_response(),
                GetSubjectError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListSubjectsError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListSubjectsError::Access(e) => return AppError::from(e).into_response(),
                ListSubjectsError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in subjects API: {}", err);
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
    fn test_course_mismatch_maps_to_404() {
        let response = SubjectApiError::Get(GetSubjectError::NotFoundInCourse).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
