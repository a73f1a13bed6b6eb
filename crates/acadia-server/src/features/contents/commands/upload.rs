//! Upload content command
//!
//! Writes the bytes to object storage first, then the metadata row. If the
//! row insert fails the uploaded object is removed so storage does not
//! accumulate orphans.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::parse_status;
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::storage::Storage;

/// Maximum accepted upload size: 50 MiB.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Command to upload a file under a batch. Built by the route handler from
/// the multipart body, never deserialized directly.
#[derive(Debug, Clone)]
pub struct UploadContentCommand {
    pub batch_id: Uuid,
    pub title: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadContentResponse {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub title: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub checksum: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadContentError {
    #[error("{0}")]
    TitleValidation(#[from] NameValidationError),

    #[error("A file is required")]
    MissingFile,

    #[error("File exceeds the maximum upload size")]
    TooLarge,

    #[error("You must be a teacher to upload content")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UploadContentResponse, UploadContentError>> for UploadContentCommand {}

impl crate::cqrs::middleware::Command for UploadContentCommand {}

impl UploadContentCommand {
    pub fn validate(&self) -> Result<(), UploadContentError> {
        validate_name(&self.title, "Content title", 256)?;
        if self.file_name.trim().is_empty() || self.data.is_empty() {
            return Err(UploadContentError::MissingFile);
        }
        if self.data.len() > MAX_UPLOAD_BYTES {
            return Err(UploadContentError::TooLarge);
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContentRecord {
    id: Uuid,
    batch_id: Uuid,
    title: String,
    file_name: String,
    content_type: Option<String>,
    size_bytes: i64,
    checksum: String,
    status: String,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(
    skip(pool, storage, command),
    fields(batch_id = %command.batch_id, file = %command.file_name, bytes = command.data.len())
)]
pub async fn handle(
    pool: PgPool,
    storage: Storage,
    command: UploadContentCommand,
) -> Result<UploadContentResponse, UploadContentError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Teacher) {
        return Err(UploadContentError::RoleRequired);
    }
    let business_id = access::authorize_batch(&pool, &command.auth, command.batch_id).await?;

    let content_id = Uuid::new_v4();
    let key =
        storage.build_content_key(business_id, command.batch_id, content_id, &command.file_name);

    let upload = storage
        .upload(&key, command.data.clone(), command.content_type.clone())
        .await?;

    let insert = sqlx::query_as::<_, ContentRecord>(
        r#"
        INSERT INTO contents (id, batch_id, title, file_name, content_type, size_bytes, checksum, storage_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, batch_id, title, file_name, content_type, size_bytes, checksum, status, created_at
        "#,
    )
    .bind(content_id)
    .bind(command.batch_id)
    .bind(&command.title)
    .bind(&command.file_name)
    .bind(&command.content_type)
    .bind(upload.size)
    .bind(&upload.checksum)
    .bind(&upload.key)
    .fetch_one(&pool)
    .await;

    let record = match insert {
        Ok(record) => record,
        Err(e) => {
            // Don't leave an orphaned object behind.
            if let Err(cleanup) = storage.delete(&key).await {
                tracing::warn!("Failed to clean up orphaned upload {}: {}", key, cleanup);
            }
            return Err(e.into());
        },
    };

    tracing::info!(content_id = %record.id, "Content uploaded");

    Ok(UploadContentResponse {
        id: record.id,
        batch_id: record.batch_id,
        title: record.title,
        file_name: record.file_name,
        content_type: record.content_type,
        size_bytes: record.size_bytes,
        checksum: record.checksum,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> UploadContentCommand {
        UploadContentCommand {
            batch_id: Uuid::new_v4(),
            title: "Week 3 notes".to_string(),
            file_name: "notes.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            data: vec![1, 2, 3],
            auth: AuthUser::default(),
        }
    }

    #[test]
    fn test_validate_passes() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_file() {
        let mut cmd = command();
        cmd.data.clear();
        assert!(matches!(cmd.validate(), Err(UploadContentError::MissingFile)));
    }

    #[test]
    fn test_validate_rejects_oversize_file() {
        let mut cmd = command();
        cmd.data = vec![0; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(cmd.validate(), Err(UploadContentError::TooLarge)));
    }
}
