//! Course API routes
//!
//! - `POST /api/v1/exams/:exam_id/courses` - Create a course
//! - `GET /api/v1/exams/:exam_id/courses` - List courses
//! - `GET /api/v1/exams/:exam_id/courses/:course_id` - Get a course (404 on exam mismatch)
//! - `PUT /api/v1/courses/:id` - Update a course
//! - `DELETE /api/v1/courses/:id` - Soft delete a course

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
    CreateCourseCommand, CreateCourseError, DeleteCourseCommand, DeleteCourseError,
    UpdateCourseCommand, UpdateCourseError,
};
use super::queries::{GetCourseError, GetCourseQuery, ListCoursesError, ListCoursesQuery};

/// Routes mounted under `/exams/:exam_id/courses`.
pub fn exam_courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/", get(list_courses))
        .route("/:course_id", get(get_course))
}

/// Routes mounted under `/courses`.
pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", put(update_course))
        .route("/:id", delete(delete_course))
}

#[tracing::instrument(skip(pool, auth, command), fields(exam_id = %exam_id))]
async fn create_course(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(exam_id): Path<Uuid>,
    Json(mut command): Json<CreateCourseCommand>,
) -> Result<Response, CourseApiError> {
    command.exam_id = exam_id;
    command.auth = auth;

    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(course_id = %response.id, "Course created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Course created", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, query), fields(exam_id = %exam_id))]
async fn list_courses(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(exam_id): Path<Uuid>,
    Query(mut query): Query<ListCoursesQuery>,
) -> Result<Response, CourseApiError> {
    query.exam_id = exam_id;
    query.auth = auth;

    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            "Courses retrieved",
            response.items,
            meta,
        )),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(exam_id = %exam_id, course_id = %course_id))]
async fn get_course(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path((exam_id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, CourseApiError> {
    let query = GetCourseQuery {
        exam_id,
        course_id,
        auth,
    };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Course retrieved", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth, command), fields(course_id = %id))]
async fn update_course(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateCourseCommand>,
) -> Result<Response, CourseApiError> {
    command.id = id;
    command.auth = auth;

    let response = super::commands::update::handle(pool, command).await?;

    tracing::info!(course_id = %response.id, "Course updated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Course updated", response)),
    )
        .into_response())
}

#[tracing::instrument(skip(pool, auth), fields(course_id = %id))]
async fn delete_course(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, CourseApiError> {
    let command = DeleteCourseCommand { id, auth };

    let response = super::commands::delete::handle(pool, command).await?;

    tracing::info!(course_id = %response.id, "Course deactivated via API");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Course deleted", response)),
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum CourseApiError {
    Create(CreateCourseError),
    Update(UpdateCourseError),
    Delete(DeleteCourseError),
    Get(GetCourseError),
    List(ListCoursesError),
}

impl From<CreateCourseError> for CourseApiError {
    fn from(err: CreateCourseError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateCourseError> for CourseApiError {
    fn from(err: UpdateCourseError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteCourseError> for CourseApiError {
    fn from(err: DeleteCourseError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetCourseError> for CourseApiError {
    fn from(err: GetCourseError) -> Self {
        Self::Get(err)
    }
}

impl From<ListCoursesError> for CourseApiError {
    fn from(err: ListCoursesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for CourseApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Create(err) => match err {
                CreateCourseError::NameValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                CreateCourseError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                CreateCourseError::Access(e) => return AppError::from(e).into_response(),
                CreateCourseError::Database(_) => return database_error(&err),
            },
            Self::Update(err) => match err {
                UpdateCourseError::NoFieldsToUpdate | UpdateCourseError::NameValidation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                UpdateCourseError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                UpdateCourseError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                UpdateCourseError::Access(e) => return AppError::from(e).into_response(),
                UpdateCourseError::Database(_) => return database_error(&err),
            },
            Self::Delete(err) => match err {
                DeleteCourseError::RoleRequired => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                },
                DeleteCourseError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                DeleteCourseError::Access(e) => return AppError::from(e).into_response(),
                DeleteCourseError::Database(_) => return database_error(&err),
            },
            Self::Get(err) => match err {
                GetCourseError::NotFoundInExam => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                },
                GetCourseError::Access(e) => return AppError::from(e).into_response(),
                GetCourseError::Database(_) => return database_error(&err),
            },
            Self::List(err) => match err {
                ListCoursesError::InvalidPagination(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                },
                ListCoursesError::Access(e) => return AppError::from(e).into_response(),
                ListCoursesError::Database(_) => return database_error(&err),
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn database_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!("Database error in courses API: {}", err);
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
    fn test_exam_mismatch_maps_to_404() {
        let response = CourseApiError::Get(GetCourseError::NotFoundInExam).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
