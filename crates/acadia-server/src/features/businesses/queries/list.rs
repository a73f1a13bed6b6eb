//! List businesses query
//!
//! SUPERADMIN sees every tenant; everyone else sees only their own. Listings
//! exclude INACTIVE rows unless `include_inactive` is set.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use acadia_common::Role;

use crate::auth::AuthUser;
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get::{BusinessRecord, BusinessResponse};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListBusinessesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,

    #[serde(default)]
    pub include_inactive: bool,

    #[serde(skip)]
    pub auth: AuthUser,
}

impl ListBusinessesQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListBusinessesError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<BusinessResponse>, ListBusinessesError>> for ListBusinessesQuery {}

impl crate::cqrs::middleware::Query for ListBusinessesQuery {}

#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    query: ListBusinessesQuery,
) -> Result<Paginated<BusinessResponse>, ListBusinessesError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(ListBusinessesError::InvalidPagination)?;

    // Non-superadmin callers are pinned to their own tenant.
    let scope = if query.auth.role == Role::Superadmin {
        None
    } else {
        query.auth.business_id
    };

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM businesses
        WHERE ($1::uuid IS NULL OR id = $1)
          AND ($2 OR status = 'ACTIVE')
        "#,
    )
    .bind(scope)
    .bind(query.include_inactive)
    .fetch_one(&pool)
    .await?;

    let records = sqlx::query_as::<_, BusinessRecord>(
        r#"
        SELECT id, name, email, phone, address, status, created_at, updated_at
        FROM businesses
        WHERE ($1::uuid IS NULL OR id = $1)
          AND ($2 OR status = 'ACTIVE')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(scope)
    .bind(query.include_inactive)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let items = records
        .into_iter()
        .map(BusinessRecord::into_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}
