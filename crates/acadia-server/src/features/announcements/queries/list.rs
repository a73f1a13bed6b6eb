//! List announcements per business

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{AnnouncementRecord, AnnouncementResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListAnnouncementsQuery {
    #[serde(skip)]
    pub business_id: Uuid,

    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(default)]
    pub include_inactive: bool,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListAnnouncementsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListAnnouncementsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<AnnouncementResponse>, ListAnnouncementsError>>
    for ListAnnouncementsQuery
{
}

impl crate::cqrs::middleware::Query for ListAnnouncementsQuery {}

#[tracing::instrument(skip(pool, query), fields(business_id = %query.business_id))]
pub async fn handle(
    pool: PgPool,
    query: ListAnnouncementsQuery,
) -> Result<Paginated<AnnouncementResponse>, ListAnnouncementsError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListAnnouncementsError::InvalidPagination)?;

    access::authorize_business(&pool, &query.auth, query.business_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM announcements
        WHERE business_id = $1 AND ($2 OR status = 'ACTIVE')
        "#,
    )
    .bind(query.business_id)
    .bind(query.include_inactive)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, AnnouncementRecord>(
        r#"
        SELECT id, business_id, title, body, status, created_at, updated_at
        FROM announcements
        WHERE business_id = $1 AND ($2 OR status = 'ACTIVE')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.business_id)
    .bind(query.include_inactive)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(AnnouncementRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}
