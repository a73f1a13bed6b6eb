//! Delete course command: soft delete.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCourseCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCourseResponse {
    pub id: Uuid,
    pub status: EntityStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCourseError {
    #[error("You must be an admin to delete courses")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Course not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteCourseResponse, DeleteCourseError>> for DeleteCourseCommand {}

impl crate::cqrs::middleware::Command for DeleteCourseCommand {}

#[tracing::instrument(skip(pool, command), fields(course_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteCourseCommand,
) -> Result<DeleteCourseResponse, DeleteCourseError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(DeleteCourseError::RoleRequired);
    }
    access::authorize_course(&pool, &command.auth, command.id).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE courses SET status = 'INACTIVE', updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteCourseError::NotFound)?;

    tracing::info!("Course deactivated");

    Ok(DeleteCourseResponse {
        id,
        status: EntityStatus::Inactive,
    })
}
