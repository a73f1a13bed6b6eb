//! Get course query
//!
//! The course is addressed through its exam. A real course fetched through
//! the wrong exam is reported as "Course not found in this exam" with a 404,
//! exactly like a course that does not exist at all.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::EntityStatus;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::parse_status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCourseQuery {
    pub exam_id: Uuid,
    pub course_id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCourseError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Course not found in this exam")]
    NotFoundInExam,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CourseResponse, GetCourseError>> for GetCourseQuery {}

impl crate::cqrs::middleware::Query for GetCourseQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CourseRecord {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseRecord {
    pub(crate) fn into_response(self) -> Result<CourseResponse, sqlx::Error> {
        Ok(CourseResponse {
            id: self.id,
            exam_id: self.exam_id,
            name: self.name,
            description: self.description,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[tracing::instrument(
    skip(pool, query),
    fields(exam_id = %query.exam_id, course_id = %query.course_id)
)]
pub async fn handle(pool: PgPool, query: GetCourseQuery) -> Result<CourseResponse, GetCourseError> {
    access::authorize_exam(&pool, &query.auth, query.exam_id).await?;

    let record = sqlx::query_as::<_, CourseRecord>(
        r#"
        SELECT id, exam_id, name, description, status, created_at, updated_at
        FROM courses
        WHERE id = $1 AND exam_id = $2
        "#,
    )
    .bind(query.course_id)
    .bind(query.exam_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetCourseError::NotFoundInExam)?;

    Ok(record.into_response()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_error_message() {
        assert_eq!(
            GetCourseError::NotFoundInExam.to_string(),
            "Course not found in this exam"
        );
    }
}
