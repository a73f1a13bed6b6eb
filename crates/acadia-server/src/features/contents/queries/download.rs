//! Download content query: issues a short-lived presigned GET URL.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::storage::Storage;

/// Presigned URLs stay valid for 15 minutes.
const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadContentQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadContentResponse {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
    pub expires_in_seconds: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadContentError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Content not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DownloadContentResponse, DownloadContentError>> for DownloadContentQuery {}

impl crate::cqrs::middleware::Query for DownloadContentQuery {}

#[tracing::instrument(skip(pool, storage, query), fields(content_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    storage: Storage,
    query: DownloadContentQuery,
) -> Result<DownloadContentResponse, DownloadContentError> {
    access::authorize_content(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, (String, String)>(
        "SELECT file_name, storage_key FROM contents WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DownloadContentError::NotFound)?;

    let (file_name, storage_key) = record;
    let url = storage
        .generate_presigned_url(&storage_key, DOWNLOAD_URL_TTL)
        .await?;

    Ok(DownloadContentResponse {
        id: query.id,
        file_name,
        url,
        expires_in_seconds: DOWNLOAD_URL_TTL.as_secs(),
    })
}
