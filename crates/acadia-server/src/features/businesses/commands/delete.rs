//! Delete business command
//!
//! Soft delete: flips status to INACTIVE. The row, and everything under it,
//! stays in place.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBusinessCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBusinessResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteBusinessError {
    #[error("You must be an admin to delete a business")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Business not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteBusinessResponse, DeleteBusinessError>> for DeleteBusinessCommand {}

impl crate::cqrs::middleware::Command for DeleteBusinessCommand {}

#[tracing::instrument(skip(pool, command), fields(business_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteBusinessCommand,
) -> Result<DeleteBusinessResponse, DeleteBusinessError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteBusinessError::RoleRequired);
    }
    access::authorize_business(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE businesses SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteBusinessError::NotFound)?;

    tracing::info!("Business deactivated");

    Ok(DeleteBusinessResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
