//! Delete content command
//!
//! Unlike the soft-deleted catalog entities, deleting content removes both
//! the metadata row and the stored object.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::Role;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::storage::Storage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteContentCommand {
    pub id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteContentResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteContentError {
    #[error("You must be a teacher to delete content")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Content not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteContentResponse, DeleteContentError>> for DeleteContentCommand {}

impl crate::cqrs::middleware::Command for DeleteContentCommand {}

#[tracing::instrument(skip(pool, storage, command), fields(content_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    storage: Storage,
    command: DeleteContentCommand,
) -> Result<DeleteContentResponse, DeleteContentError> {
    if !command.auth.role.at_least(Role::Teacher) {
        return Err(DeleteContentError::RoleRequired);
    }
    access::authorize_content(&pool, &command.auth, command.id).await?;

    let storage_key = sqlx::query_scalar::<_, String>(
        "DELETE FROM contents WHERE id = $1 RETURNING storage_key",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteContentError::NotFound)?;

    // Row is gone; a failed object delete only leaks storage, so log and
    // continue rather than resurrecting the row.
    if let Err(e) = storage.delete(&storage_key).await {
        tracing::warn!("Failed to delete stored object {}: {}", storage_key, e);
    }

    tracing::info!("Content deleted");

    Ok(DeleteContentResponse { id: command.id })
}
