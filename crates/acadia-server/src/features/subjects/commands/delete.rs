//! Delete subject command: soft delete.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSubjectCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSubjectResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteSubjectError {
    #[error("You must be an admin to delete subjects")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Subject not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteSubjectResponse, DeleteSubjectError>> for DeleteSubjectCommand {}

impl crate::cqrs::middleware::Command for DeleteSubjectCommand {}

#[tracing::instrument(skip(pool, command), fields(subject_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteSubjectCommand,
) -> Result<DeleteSubjectResponse, DeleteSubjectError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteSubjectError::RoleRequired);
    }
    access::authorize_subject(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE subjects SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteSubjectError::NotFound)?;

    tracing::info!("Subject deactivated");

    Ok(DeleteSubjectResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
