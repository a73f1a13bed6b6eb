//! Unenroll user command: hard-deletes the join row.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::Role;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnenrollUserCommand {
    pub batch_id: Uuid,
    pub user_id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnenrollUserResponse {
    pub batch_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum UnenrollUserError {
    #[error("You must be an admin to manage enrollment")]
    RoleRequired,

    #[error("User is not enrolled in this batch")]
    NotEnrolled,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UnenrollUserResponse, UnenrollUserError>> for UnenrollUserCommand {}

impl crate::cqrs::middleware::Command for UnenrollUserCommand {}

#[tracing::instrument(
    skip(pool, command),
    fields(batch_id = %command.batch_id, user_id = %command.user_id)
)]
pub async fn handle(
    pool: PgPool,
    command: UnenrollUserCommand,
) -> Result<UnenrollUserResponse, UnenrollUserError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(UnenrollUserError::RoleRequired);
    }
    access::authorize_batch(&pool, &command.auth, command.batch_id).await?;

    let result = sqlx::query("DELETE FROM batch_users WHERE batch_id = $1 AND user_id = $2")
        .bind(command.batch_id)
        .bind(command.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(UnenrollUserError::NotEnrolled);
    }

    tracing::info!("User unenrolled");

    Ok(UnenrollUserResponse {
        batch_id: command.batch_id,
        user_id: command.user_id,
    })
}
