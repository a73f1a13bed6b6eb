//! Get exam query

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
pub struct GetExamQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetExamError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Exam not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ExamResponse, GetExamError>> for GetExamQuery {}

impl crate::cqrs::middleware::Query for GetExamQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ExamRecord {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExamRecord {
    pub(crate) fn into_response(self) -> Result<ExamResponse, sqlx::Error> {
        Ok(ExamResponse {
            id: self.id,
            business_id: self.business_id,
            name: self.name,
            description: self.description,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[tracing::instrument(skip(pool, query), fields(exam_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetExamQuery) -> Result<ExamResponse, GetExamError> {
    access::authorize_exam(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, ExamRecord>(
        r#"
        SELECT id, business_id, name, description, status, created_at, updated_at
        FROM exams
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetExamError::NotFound)?;

    Ok(record.into_response()?)
}
