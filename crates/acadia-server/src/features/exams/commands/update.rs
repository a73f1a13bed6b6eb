//! Update exam command
//!
//! Renames re-run the ACTIVE-name uniqueness pre-check inside a SERIALIZABLE
//! transaction, excluding the exam being updated.

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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExamCommand {
    #[serde(skip)]
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExamResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateExamError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You must be an admin to update exams")]
    RoleRequired,

    #[error("An active exam named '{0}' already exists in this business")]
    DuplicateName(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Exam not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateExamResponse, UpdateExamError>> for UpdateExamCommand {}

impl crate::cqrs::middleware::Command for UpdateExamCommand {}

impl UpdateExamCommand {
    pub fn validate(&self) -> Result<(), UpdateExamError> {
        if self.name.is_none() && self.description.is_none() && self.status.is_none() {
            return Err(UpdateExamError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "Exam name", 256)?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExamRecord {
    id: Uuid,
    business_id: Uuid,
    name: String,
    description: Option<String>,
    status: String,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(exam_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateExamCommand,
) -> Result<UpdateExamResponse, UpdateExamError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateExamError::RoleRequired);
    }
    let business_id = access::authorize_exam(&pool, &command.auth, command.id).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    if let Some(ref name) = command.name {
        let duplicate = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM exams
            WHERE business_id = $1 AND LOWER(name) = LOWER($2)
              AND status = 'ACTIVE' AND id <> $3
            "#,
        )
        .bind(business_id)
        .bind(name)
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?;

        if duplicate.is_some() {
            return Err(UpdateExamError::DuplicateName(name.clone()));
        }
    }

    let record = sqlx::query_as::<_, ExamRecord>(
        r#"
        UPDATE exams
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            status = COALESCE($4, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, business_id, name, description, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.name)
    .bind(&command.description)
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                let name = command.name.clone().unwrap_or_default();
                return UpdateExamError::DuplicateName(name);
            }
        }
        UpdateExamError::Database(e)
    })?
    .ok_or(UpdateExamError::NotFound)?;

    tx.commit().await?;

    tracing::info!("Exam updated");

    Ok(UpdateExamResponse {
        id: record.id,
        business_id: record.business_id,
        name: record.name,
        description: record.description,
        status: parse_status(&record.status)?,
        updated_at: record.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_update() {
        let cmd = UpdateExamCommand {
            id: Uuid::new_v4(),
            name: None,
            description: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(matches!(cmd.validate(), Err(UpdateExamError::NoFieldsToUpdate)));
    }

    #[test]
    fn test_validate_rejects_blank_rename() {
        let cmd = UpdateExamCommand {
            id: Uuid::new_v4(),
            name: Some("".to_string()),
            description: None,
            status: None,
            auth: AuthUser::default(),
        };
        let err = cmd.validate().unwrap_err();
        assert_eq!(err.to_string(), "Exam name is required");
    }
}
