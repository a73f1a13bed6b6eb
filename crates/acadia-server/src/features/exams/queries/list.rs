//! List exams per business

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{ExamRecord, ExamResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListExamsQuery {
    #[serde(skip)]
    pub business_id: Uuid,

    // Top-level fields, not a flattened struct: query-string deserialization
    // cannot route numeric values through `serde(flatten)`.
    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(default)]
    pub include_inactive: bool,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListExamsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListExamsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<ExamResponse>, ListExamsError>> for ListExamsQuery {}

impl crate::cqrs::middleware::Query for ListExamsQuery {}

#[tracing::instrument(skip(pool, query), fields(business_id = %query.business_id))]
pub async fn handle(
    pool: PgPool,
    query: ListExamsQuery,
) -> Result<Paginated<ExamResponse>, ListExamsError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListExamsError::InvalidPagination)?;

    access::authorize_business(&pool, &query.auth, query.business_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM exams
        WHERE business_id = $1 AND ($2 OR status = 'ACTIVE')
        "#,
    )
    .bind(query.business_id)
    .bind(query.include_inactive)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, ExamRecord>(
        r#"
        SELECT id, business_id, name, description, status, created_at, updated_at
        FROM exams
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
        .map(ExamRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_with_pagination_deserializes() {
        let query: ListExamsQuery = serde_urlencoded::from_str("page=2&per_page=5").unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(5));
        assert!(!query.include_inactive);
    }

    #[test]
    fn test_query_string_defaults() {
        let query: ListExamsQuery = serde_urlencoded::from_str("").unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.per_page, None);

        let query: ListExamsQuery =
            serde_urlencoded::from_str("include_inactive=true&per_page=50").unwrap();
        assert!(query.include_inactive);
        assert_eq!(query.pagination().per_page(), 50);
    }
}
