//! Get user query

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::{parse_role, parse_status};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub business_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub role: Role,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UserResponse, GetUserError>> for GetUserQuery {}

impl crate::cqrs::middleware::Query for GetUserQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub id: Uuid,
    pub business_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub(crate) fn into_response(self) -> Result<UserResponse, sqlx::Error> {
        Ok(UserResponse {
            id: self.id,
            business_id: self.business_id,
            name: self.name,
            email: self.email,
            mobile: self.mobile,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[tracing::instrument(skip(pool, query), fields(user_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetUserQuery) -> Result<UserResponse, GetUserError> {
    access::authorize_user(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, business_id, name, email, mobile, role, status, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetUserError::NotFound)?;

    Ok(record.into_response()?)
}
