//! Assign permissions command
//!
//! Replaces a user's whole grant set in one transaction: the existing rows
//! are deleted and the new set inserted, so a retry converges on the same
//! state and an empty list revokes everything.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::Role;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPermissionsCommand {
    /// Target user, set from the path parameter.
    #[serde(skip)]
    pub user_id: Uuid,

    pub permission_ids: Vec<Uuid>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPermissionsResponse {
    pub user_id: Uuid,
    pub granted: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AssignPermissionsError {
    #[error("You must be an admin to assign permissions")]
    RoleRequired,

    #[error("One or more permissions do not exist")]
    PermissionNotFound,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AssignPermissionsResponse, AssignPermissionsError>>
    for AssignPermissionsCommand
{
}

impl crate::cqrs::middleware::Command for AssignPermissionsCommand {}

#[tracing::instrument(
    skip(pool, command),
    fields(user_id = %command.user_id, count = command.permission_ids.len())
)]
pub async fn handle(
    pool: PgPool,
    command: AssignPermissionsCommand,
) -> Result<AssignPermissionsResponse, AssignPermissionsError> {
    if !command.auth.role.at_least(Role::Admin) {
        return Err(AssignPermissionsError::RoleRequired);
    }
    access::authorize_user(&pool, &command.auth, command.user_id).await?;

    // Dedup before counting so a repeated id in the body is not an error.
    let mut ids = command.permission_ids.clone();
    ids.sort_unstable();
    ids.dedup();

    let mut tx = pool.begin().await?;

    if !ids.is_empty() {
        let known = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM permissions WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_one(&mut *tx)
        .await?;

        if known as usize != ids.len() {
            return Err(AssignPermissionsError::PermissionNotFound);
        }
    }

    sqlx::query("DELETE FROM role_permissions WHERE user_id = $1")
        .bind(command.user_id)
        .execute(&mut *tx)
        .await?;

    let granted = if ids.is_empty() {
        0
    } else {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (user_id, permission_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(command.user_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    };

    tx.commit().await?;

    tracing::info!(granted, "Permissions assigned");

    Ok(AssignPermissionsResponse {
        user_id: command.user_id,
        granted,
    })
}
