//! Delete user command: soft delete, flips status to INACTIVE.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error("You must be an admin to delete users")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteUserResponse, DeleteUserError>> for DeleteUserCommand {}

impl crate::cqrs::middleware::Command for DeleteUserCommand {}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteUserCommand,
) -> Result<DeleteUserResponse, DeleteUserError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteUserError::RoleRequired);
    }
    access::authorize_user(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE users SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteUserError::NotFound)?;

    tracing::info!("User deactivated");

    Ok(DeleteUserResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
