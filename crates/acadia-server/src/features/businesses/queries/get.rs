//! Get business query
//!
//! Fetch-by-id returns INACTIVE rows too; soft deletion hides rows from
//! listings, not from direct lookups.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::EntityStatus;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::parse_status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBusinessQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBusinessError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Business not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<BusinessResponse, GetBusinessError>> for GetBusinessQuery {}

impl crate::cqrs::middleware::Query for GetBusinessQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BusinessRecord {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessRecord {
    pub(crate) fn into_response(self) -> Result<BusinessResponse, sqlx::Error> {
        Ok(BusinessResponse {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[tracing::instrument(skip(pool, query), fields(business_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetBusinessQuery,
) -> Result<BusinessResponse, GetBusinessError> {
    access::authorize_business(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, BusinessRecord>(
        r#"
        SELECT id, name, email, phone, address, status, created_at, updated_at
        FROM businesses
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetBusinessError::NotFound)?;

    Ok(record.into_response()?)
}
