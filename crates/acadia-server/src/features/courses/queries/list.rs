//! List courses per exam

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{CourseRecord, CourseResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListCoursesQuery {
    #[serde(skip)]
    pub exam_id: Uuid,

    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(default)]
    pub include_inactive: bool,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListCoursesQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListCoursesError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<CourseResponse>, ListCoursesError>> for ListCoursesQuery {}

impl crate::cqrs::middleware::Query for ListCoursesQuery {}

#[tracing::instrument(skip(pool, query), fields(exam_id = %query.exam_id))]
pub async fn handle(
    pool: PgPool,
    query: ListCoursesQuery,
) -> Result<Paginated<CourseResponse>, ListCoursesError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListCoursesError::InvalidPagination)?;

    access::authorize_exam(&pool, &query.auth, query.exam_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM courses
        WHERE exam_id = $1 AND ($2 OR status = 'ACTIVE')
        "#,
    )
    .bind(query.exam_id)
    .bind(query.include_inactive)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, CourseRecord>(
        r#"
        SELECT id, exam_id, name, description, status, created_at, updated_at
        FROM courses
        WHERE exam_id = $1 AND ($2 OR status = 'ACTIVE')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.exam_id)
    .bind(query.include_inactive)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(CourseRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}
