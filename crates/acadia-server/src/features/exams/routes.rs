//! Exam API routes
//!
//! - `POST /api/v1/businesses/:business_id/exams` - Create an exam
//! - `GET /api/v1/businesses/:business_id/exams` - List exams
//! - `GET /api/v1/exams/:id` - Get an exam
//! - `PUT /api/v1/exams/:id` - Update an exam
//! - `DELETE /api/v1/exams/:id` - Soft delete an exam

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
    CreateExamCommand, CreateExamError, DeleteExamCommand, DeleteExamError, UpdateExamCommand,
    UpdateExamError,
};
use super::queries::{GetExamError, GetExamQuery, ListExamsError, ListExamsQuery};

/// Routes mounted under `/businesses/:business_id/exams`.
pub fn business_exams_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam))
        .route("/", get(list_exams))
}

/// Routes mounted under `/exams`.
pub fn exams_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_exam))
        .route("/:id", put(update_exam))
        .route("/:id", delete(delete_exam))
}

/// Create an exam
///
/// # Response
///
/// - `201 Created` - Exam created
/// - `400 Bad Request` - Empty name ("Exam name is required")
/// - `409 Conflict` - An ACTIVE exam with the same name exists in the business
#[tracing::instrument(skip(pool, auth, command), fields(business_id = %business_id))]
async fn create_exam(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(business_id): Path<Uuid>,
    Json(mut command): Json<CreateExamCommand>,
) -> Result<Response, ExamApiError> {
    command.business_id = business_id;
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(exam_id = %response.id, "Exam created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Exam created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query), fields(business_id = %business_id))]
async fn list_exams(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(business_id): Path<Uuid>,
    Query(mut query): Query<ListExamsQuery>,
) -> Result<Response, ExamApiError> {
    query.business_id = business_id;
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Exams retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(exam_id = %id))]
async fn get_exam(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ExamApiError> {
    let query = GetExamQuery { id, auth };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Exam retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(exam_id = %id))]
async fn update_exam(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateExamCommand>,
) -> Result<Response, ExamApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!(exam_id = %response.id, "Exam updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Exam updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(exam_id = %id))]
async fn delete_exam(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ExamApiError> {
    let command = DeleteExamCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!(exam_id = %response.id, "Exam deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Exam deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum ExamApiError {
    Create(CreateExamError),
    Update(UpdateExamError),
    Delete(DeleteExamError),
    Get(GetExamError),
    List(ListExamsError),
}

impl From<CreateExamError> for ExamApiError {
    fn from(err: CreateExamError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateExamError> for ExamApiError {
    fn from(err: UpdateExamError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteExamError> for ExamApiError {
    fn from(err: DeleteExamError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetExamError> for ExamApiError {
    fn from(err: GetExamError) -> Self {
        Self::Get(err)
    }
}

impl From<ListExamsError> for ExamApiError {
    fn from(err: ListExamsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ExamApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreateExamError::NameValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateExamError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateExamError::DuplicateName(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                },
                CreateExamError::Access(e) => return AppError::from(e).into_response(),
                CreateExamError::Database(_) => return database_error(&err),
            },
            Self::Update(err) => match err {
                UpdateExamError::NoFieldsToUpdate | UpdateExamError::NameValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateExamError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateExamError::DuplicateName(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                },
                UpdateExamError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                UpdateExamError::Access(e) => return AppError::from(e).into_response(),
                UpdateExamError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteExamError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteExamError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                DeleteExamError::Access(e) => return AppError::from(e).into_response(),
                DeleteExamError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetExamError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                GetExamError::Access(e) => return AppError::from(e).into_response(),
                GetExamError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListExamsError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListExamsError::Access(e) => return AppError::from(e).into_response(),
                ListExamsError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in exams API: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::validation::NameValidationError;

    #[test]
    fn test_duplicate_name_maps_to_409() {
        let err = ExamApiError::Create(CreateExamError::DuplicateName("Finals".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_empty_name_maps_to_400() {
        let err = ExamApiError::Create(CreateExamError::NameValidation(
            NameValidationError::Required {
                field: "Exam name".to_string(),
            },
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
