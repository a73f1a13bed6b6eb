//! List enrolled users for a batch

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};
use crate::features::shared::{parse_role, parse_status};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListBatchUsersQuery {
    #[serde(skip)]
    pub batch_id: Uuid,

    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListBatchUsersQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: EntityStatus,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListBatchUsersError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<EnrolledUser>, ListBatchUsersError>> for ListBatchUsersQuery {}

impl crate::cqrs::middleware::Query for ListBatchUsersQuery {}

#[derive(Debug, sqlx::FromRow)]
struct EnrolledUserRecord {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    status: String,
    added_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, query), fields(batch_id = %query.batch_id))]
pub async fn handle(
    pool: PgPool,
    query: ListBatchUsersQuery,
) -> Result<Paginated<EnrolledUser>, ListBatchUsersError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListBatchUsersError::InvalidPagination)?;

    access::authorize_batch(&pool, &query.auth, query.batch_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM batch_users WHERE batch_id = $1",
    )
    .bind(query.batch_id)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, EnrolledUserRecord>(
        r#"
        SELECT u.id, u.name, u.email, u.role, u.status, bu.added_at
        FROM batch_users bu
        JOIN users u ON u.id = bu.user_id
        WHERE bu.batch_id = $1
        ORDER BY bu.added_at ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.batch_id)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(|r| {
            Ok::<_, sqlx::Error>(EnrolledUser {
                id: r.id,
                name: r.name,
                email: r.email,
                role: parse_role(&r.role)?,
                status: parse_status(&r.status)?,
                added_at: r.added_at,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}
