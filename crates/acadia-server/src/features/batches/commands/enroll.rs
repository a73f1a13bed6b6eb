//! Enroll users command
//!
//! Adds users to a batch. Enrollment is idempotent: users already in the
//! batch are skipped via `ON CONFLICT DO NOTHING`. Every enrolled user must
//! belong to the batch's business.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::Role;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollUsersCommand {
    /// Target batch, set from the path parameter.
    #[serde(skip)]
    pub batch_id: Uuid,

    pub user_ids: Vec<Uuid>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollUsersResponse {
    pub batch_id: Uuid,
    /// Users newly added; already-enrolled users are not counted.
    pub enrolled: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum EnrollUsersError {
    #[error("At least one user id is required")]
    NoUsers,

    #[error("You must be an admin to manage enrollment")]
    RoleRequired,

    #[error("User not found")]
    UserNotFound,

    #[error("Users must belong to the batch's business")]
    CrossTenantUser,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<EnrollUsersResponse, EnrollUsersError>> for EnrollUsersCommand {}

impl crate::cqrs::middleware::Command for EnrollUsersCommand {}

impl EnrollUsersCommand {
    pub fn validate(&self) -> Result<(), EnrollUsersError> {
        if self.user_ids.is_empty() {
            return Err(EnrollUsersError::NoUsers);
        }
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(batch_id = %command.batch_id, users = command.user_ids.len())
)]
pub async fn handle(
    pool: PgPool,
    command: EnrollUsersCommand,
) -> Result<EnrollUsersResponse, EnrollUsersError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(EnrollUsersError::RoleRequired);
    }
    let business_id = access::authorize_batch(&pool, &command.auth, command.batch_id).await?;

    // Dedup so a repeated id in the body is not mistaken for a missing user.
    let mut user_ids = command.user_ids.clone();
    user_ids.sort_unstable();
    user_ids.dedup();

    // All target users must exist and live in the batch's business.
    let owners = sqlx::query_as::<_, (Uuid, Option<Uuid>)>(
        "SELECT id, business_id FROM users WHERE id = ANY($1)",
    )
    .bind(&user_ids)
    .fetch_all(&pool)
    .await?;

    if owners.len() != user_ids.len() {
        return Err(EnrollUsersError::UserNotFound);
    }
    if owners.iter().any(|(_, owner)| *owner != Some(business_id)) {
        return Err(EnrollUsersError::CrossTenantUser);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO batch_users (batch_id, user_id)
        SELECT $1, unnest($2::uuid[])
        ON CONFLICT (batch_id, user_id) DO NOTHING
        "#,
    )
    .bind(command.batch_id)
    .bind(&user_ids)
    .execute(&pool)
    .await?;

    tracing::info!(enrolled = result.rows_affected(), "Users enrolled");

    Ok(EnrollUsersResponse {
        batch_id: command.batch_id,
        enrolled: result.rows_affected(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_user_list() {
        let cmd = EnrollUsersCommand {
            batch_id: Uuid::new_v4(),
            user_ids: vec![],
            auth: AuthUser::default(),
        };
        assert!(matches!(cmd.validate(), Err(EnrollUsersError::NoUsers)));
    }
}
