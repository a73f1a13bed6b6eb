//! Get content metadata query

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
pub struct GetContentQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub title: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub checksum: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetContentError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Content not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ContentResponse, GetContentError>> for GetContentQuery {}

impl crate::cqrs::middleware::Query for GetContentQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ContentRecord {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub title: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub checksum: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    pub(crate) fn into_response(self) -> Result<ContentResponse, sqlx::Error> {
        Ok(ContentResponse {
            id: self.id,
            batch_id: self.batch_id,
            title: self.title,
            file_name: self.file_name,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            checksum: self.checksum,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[tracing::instrument(skip(pool, query), fields(content_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetContentQuery,
) -> Result<ContentResponse, GetContentError> {
    access::authorize_content(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, ContentRecord>(
        r#"
        SELECT id, batch_id, title, file_name, content_type, size_bytes, checksum, status, created_at
        FROM contents
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetContentError::NotFound)?;

    Ok(record.into_response()?)
}
