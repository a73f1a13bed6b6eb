//! Delete announcement command: soft delete.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAnnouncementCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAnnouncementResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAnnouncementError {
    #[error("You must be an admin to delete announcements")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Announcement not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteAnnouncementResponse, DeleteAnnouncementError>>
    for DeleteAnnouncementCommand
{
}

impl crate::cqrs::middleware::Command for DeleteAnnouncementCommand {}

#[tracing::instrument(skip(pool, command), fields(announcement_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteAnnouncementCommand,
) -> Result<DeleteAnnouncementResponse, DeleteAnnouncementError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteAnnouncementError::RoleRequired);
    }
    access::authorize_announcement(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE announcements SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteAnnouncementError::NotFound)?;

    tracing::info!("Announcement deactivated");

    Ok(DeleteAnnouncementResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
