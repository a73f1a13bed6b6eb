//! Delete exam command: soft delete. An INACTIVE exam frees its name for
//! reuse by a new ACTIVE exam.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteExamCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteExamResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteExamError {
    #[error("You must be an admin to delete exams")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Exam not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteExamResponse, DeleteExamError>> for DeleteExamCommand {}

impl crate::cqrs::middleware::Command for DeleteExamCommand {}

#[tracing::instrument(skip(pool, command), fields(exam_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteExamCommand,
) -> Result<DeleteExamResponse, DeleteExamError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteExamError::RoleRequired);
    }
    access::authorize_exam(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE exams SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteExamError::NotFound)?;

    tracing::info!("Exam deactivated");

    Ok(DeleteExamResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
