//! Get subject query; a subject fetched through a course it does not belong
//! to is a 404.

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
pub struct GetSubjectQuery {
    pub course_id: Uuid,
    pub subject_id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetSubjectError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Subject not found in this course")]
    NotFoundInCourse,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<SubjectResponse, GetSubjectError>> for GetSubjectQuery {}

impl crate::cqrs::middleware::Query for GetSubjectQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubjectRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubjectRecord {
    pub(crate) fn into_response(self) -> Result<SubjectResponse, sqlx::Error> {
        Ok(SubjectResponse {
            id: self.id,
            course_id: self.course_id,
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
    fields(course_id = %query.course_id, subject_id = %query.subject_id)
)]
pub async fn handle(
    pool: PgPool,
    query: GetSubjectQuery,
) -> Result<SubjectResponse, GetSubjectError> {
    access::authorize_course(&pool, &query.auth, query.course_id).await?;

    let record = sqlx::query_as::<_, SubjectRecord>(
        r#"
        SELECT id, course_id, name, description, status, created_at, updated_at
        FROM subjects
        WHERE id = $1 AND course_id = $2
        "#,
    )
    .bind(query.subject_id)
    .bind(query.course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetSubjectError::NotFoundInCourse)?;

    Ok(record.into_response()?)
}
