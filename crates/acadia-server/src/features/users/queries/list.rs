//! List users per business, with optional role and status filters

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{UserRecord, UserResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListUsersQuery {
    /// Set from the path parameter.
    #[serde(skip)]
    pub business_id: Uuid,

    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListUsersQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<UserResponse>, ListUsersError>> for ListUsersQuery {}

impl crate::cqrs::middleware::Query for ListUsersQuery {}

#[tracing::instrument(skip(pool, query), fields(business_id = %query.business_id))]
pub async fn handle(
    pool: PgPool,
    query: ListUsersQuery,
) -> Result<Paginated<UserResponse>, ListUsersError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListUsersError::InvalidPagination)?;

    access::authorize_business(&pool, &query.auth, query.business_id).await?;

    let role_filter = query.role.map(|r| r.as_str());
    let status_filter = query.status.map(|s| s.as_str());

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        WHERE business_id = $1
          AND ($2::text IS NULL OR role = $2)
          AND ($3::text IS NULL OR status = $3)
        "#,
    )
    .bind(query.business_id)
    .bind(role_filter)
    .bind(status_filter)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, business_id, name, email, mobile, role, status, created_at, updated_at
        FROM users
        WHERE business_id = $1
          AND ($2::text IS NULL OR role = $2)
          AND ($3::text IS NULL OR status = $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(query.business_id)
    .bind(role_filter)
    .bind(status_filter)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(UserRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Filters and pagination arrive in one query string; all fields must
    // deserialize from their urlencoded form.
    #[test]
    fn test_query_string_with_filters_deserializes() {
        let query: ListUsersQuery =
            serde_urlencoded::from_str("page=3&per_page=10&role=TEACHER&status=ACTIVE").unwrap();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.per_page, Some(10));
        assert_eq!(query.role, Some(Role::Teacher));
        assert_eq!(query.status, Some(EntityStatus::Active));
    }
}
