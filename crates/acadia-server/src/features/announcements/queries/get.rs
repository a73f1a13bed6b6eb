//! Get announcement query

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
pub struct GetAnnouncementQuery {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetAnnouncementError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Announcement not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AnnouncementResponse, GetAnnouncementError>> for GetAnnouncementQuery {}

impl crate::cqrs::middleware::Query for GetAnnouncementQuery {}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AnnouncementRecord {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnnouncementRecord {
    pub(crate) fn into_response(self) -> Result<AnnouncementResponse, sqlx::Error> {
        Ok(AnnouncementResponse {
            id: self.id,
            business_id: self.business_id,
            title: self.title,
            body: self.body,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[tracing::instrument(skip(pool, query), fields(announcement_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetAnnouncementQuery,
) -> Result<AnnouncementResponse, GetAnnouncementError> {
    access::authorize_announcement(&pool, &query.auth, query.id).await?;

    let record = sqlx::query_as::<_, AnnouncementRecord>(
        r#"
        SELECT id, business_id, title, body, status, created_at, updated_at
        FROM announcements
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetAnnouncementError::NotFound)?;

    Ok(record.into_response()?)
}
