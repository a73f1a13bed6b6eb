//! List the permission catalog

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::pagination::{Paginated, PaginationParams};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListPermissionsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListPermissionsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub id: Uuid,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListPermissionsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<PermissionResponse>, ListPermissionsError>> for ListPermissionsQuery {}

impl crate::cqrs::middleware::Query for ListPermissionsQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PermissionRecord {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PermissionRecord {
    pub(crate) fn into_response(self) -> PermissionResponse {
        PermissionResponse {
            id: self.id,
            code: self.code,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    query: ListPermissionsQuery,
) -> Result<Paginated<PermissionResponse>, ListPermissionsError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListPermissionsError::InvalidPagination)?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM permissions")
        .fetch_one(&pool)
        .await?;

    let records = sqlx::query_as::<_, PermissionRecord>(
        r#"
        SELECT id, code, description, created_at
        FROM permissions
        ORDER BY code
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(PermissionRecord::into_response)
        .collect();

    Ok(Paginated::from_items(items, &pagination, total))
}
