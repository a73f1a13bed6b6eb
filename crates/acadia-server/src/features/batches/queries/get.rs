//! Get batch query

use chrono::{DateTime, NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::EntityStatus;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::parse_status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBatchQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBatchError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Batch not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<BatchResponse, GetBatchError>> for GetBatchQuery {}

impl crate::cqrs::middleware::Query for GetBatchQuery {}

#[derive(Debug, sqlx::FromRow)]
struct BatchRecord {
    id: Uuid,
    course_id: Uuid,
    name: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, query), fields(batch_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetBatchQuery) -> Result<BatchResponse, GetBatchError> {
    access::authorize_batch(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, BatchRecord>(
        r#"
        SELECT id, course_id, name, start_date, end_date, status, created_at, updated_at
        FROM batches
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetBatchError::NotFound)?;

    Ok(BatchResponse {
        id: record.id,
        course_id: record.course_id,
        name: record.name,
        start_date: record.start_date,
        end_date: record.end_date,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
