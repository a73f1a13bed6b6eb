//! Delete batch command: soft delete. Enrollment rows are left in place.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBatchCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBatchResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteBatchError {
    #[error("You must be an admin to delete batches")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Batch not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteBatchResponse, DeleteBatchError>> for DeleteBatchCommand {}

impl crate::cqrs::middleware::Command for DeleteBatchCommand {}

#[tracing::instrument(skip(pool, command), fields(batch_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteBatchCommand,
) -> Result<DeleteBatchResponse, DeleteBatchError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteBatchError::RoleRequired);
    }
    access::authorize_batch(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE batches SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteBatchError::NotFound)?;

    tracing::info!("Batch deactivated");

    Ok(DeleteBatchResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
