//! List subjects per course

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{SubjectRecord, SubjectResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListSubjectsQuery {
    #[serde(skip)]
    pub course_id: Uuid,

    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(default)]
    pub include_inactive: bool,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListSubjectsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListSubjectsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<SubjectResponse>, ListSubjectsError>> for ListSubjectsQuery {}

impl crate::cqrs::middleware::Query for ListSubjectsQuery {}

#[tracing::instrument(skip(pool, query), fields(course_id = %query.course_id))]
pub async fn handle(
    pool: PgPool,
    query: ListSubjectsQuery,
) -> Result<Paginated<SubjectResponse>, ListSubjectsError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListSubjectsError::InvalidPagination)?;

    access::authorize_course(&pool, &query.auth, query.course_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM subjects
        WHERE course_id = $1 AND ($2 OR status = 'ACTIVE')
        "#,
    )
    .bind(query.course_id)
    .bind(query.include_inactive)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, SubjectRecord>(
        r#"
        SELECT id, course_id, name, description, status, created_at, updated_at
        FROM subjects
        WHERE course_id = $1 AND ($2 OR status = 'ACTIVE')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.course_id)
    .bind(query.include_inactive)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(SubjectRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}
