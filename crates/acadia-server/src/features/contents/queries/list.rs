//! List contents per batch

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{ContentRecord, ContentResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListContentsQuery {
    #[serde(skip)]
    pub batch_id: Uuid,

    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(default)]
    pub include_inactive: bool,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListContentsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListContentsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<ContentResponse>, ListContentsError>> for ListContentsQuery {}

impl crate::cqrs::middleware::Query for ListContentsQuery {}

#[tracing::instrument(skip(pool, query), fields(batch_id = %query.batch_id))]
pub async fn handle(
    pool: PgPool,
    query: ListContentsQuery,
) -> Result<Paginated<ContentResponse>, ListContentsError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListContentsError::InvalidPagination)?;

    access::authorize_batch(&pool, &query.auth, query.batch_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM contents
        WHERE batch_id = $1 AND ($2 OR status = 'ACTIVE')
        "#,
    )
    .bind(query.batch_id)
    .bind(query.include_inactive)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, ContentRecord>(
        r#"
        SELECT id, batch_id, title, file_name, content_type, size_bytes, checksum, status, created_at
        FROM contents
        WHERE batch_id = $1 AND ($2 OR status = 'ACTIVE')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.batch_id)
    .bind(query.include_inactive)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(ContentRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}
