//! Create permission command
//!
//! Permission codes are global, not tenant-scoped, so only superadmins may
//! add to the catalog.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::Role;

use crate::auth::AuthUser;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermissionCommand {
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermissionResponse {
    pub id: Uuid,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePermissionError {
    #[error("{0}")]
    CodeValidation(#[from] NameValidationError),

    #[error("Only superadmins can create permissions")]
    RoleRequired,

    #[error("A permission with code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreatePermissionResponse, CreatePermissionError>> for CreatePermissionCommand {}

impl crate::cqrs::middleware::Command for CreatePermissionCommand {}

impl CreatePermissionCommand {
    pub fn validate(&self) -> Result<(), CreatePermissionError> {
        validate_name(&self.code, "Permission code", 128)?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PermissionRecord {
    id: Uuid,
    code: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(code = %command.code))]
pub async fn handle(
    pool: PgPool,
    command: CreatePermissionCommand,
) -> Result<CreatePermissionResponse, CreatePermissionError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Superadmin) {
        return Err(CreatePermissionError::RoleRequired);
    }

    let record = sqlx::query_as::<_, PermissionRecord>(
        r#"
        INSERT INTO permissions (id, code, description)
        VALUES ($1, $2, $3)
        RETURNING id, code, description, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&command.code)
    .bind(&command.description)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreatePermissionError::DuplicateCode(command.code.clone());
            }
        }
        CreatePermissionError::Database(e)
    })?;

    tracing::info!(permission_id = %record.id, "Permission created");

    Ok(CreatePermissionResponse {
        id: record.id,
        code: record.code,
        description: record.description,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(code: &str) -> CreatePermissionCommand {
        CreatePermissionCommand {
            code: code.to_string(),
            description: None,
            auth: AuthUser {
                user_id: Uuid::new_v4(),
                business_id: None,
                role: Role::Superadmin,
            },
        }
    }

    #[test]
    fn test_validate_empty_code_message() {
        let err = command("").validate().unwrap_err();
        assert_eq!(err.to_string(), "Permission code is required");
    }

    #[test]
    fn test_validate_passes() {
        assert!(command("contents.upload").validate().is_ok());
    }
}
