//! Create exam command
//!
//! Enforces the per-business ACTIVE-name uniqueness rule with a read-then-
//! write inside one SERIALIZABLE transaction. The pre-check exists so a
//! duplicate is reported with an explicit message instead of a raw unique-
//! violation; the partial index on `exams` catches anything that slips
//! through.

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

/// Command to create an exam under a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExamCommand {
    /// Owning business, set from the path parameter.
    #[serde(skip)]
    pub business_id: Uuid,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip)]
    pub auth: AuthUser,
}

/// Response from creating an exam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExamResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating an exam
#[derive(Debug, thiserror::Error)]
pub enum CreateExamError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You must be an admin to create exams")]
    RoleRequired,

    #[error("An active exam named '{0}' already exists in this business")]
    DuplicateName(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateExamResponse, CreateExamError>> for CreateExamCommand {}

impl crate::cqrs::middleware::Command for CreateExamCommand {}

impl CreateExamCommand {
    /// Validates the command parameters
    ///
    /// # Errors
    ///
    /// - Empty name: "Exam name is required"
    /// - Name longer than 256 characters
    pub fn validate(&self) -> Result<(), CreateExamError> {
        validate_name(&self.name, "Exam name", 256)?;
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
    created_at: DateTime<Utc>,
}

/// Handler function for creating exams
#[tracing::instrument(
    skip(pool, command),
    fields(business_id = %command.business_id, name = %command.name)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateExamCommand,
) -> Result<CreateExamResponse, CreateExamError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(CreateExamError::RoleRequired);
    }
    access::authorize_business(&pool, &command.auth, command.business_id).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    let duplicate = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM exams
        WHERE business_id = $1 AND LOWER(name) = LOWER($2) AND status = 'ACTIVE'
        "#,
    )
    .bind(command.business_id)
    .bind(&command.name)
    .fetch_optional(&mut *tx)
    .await?;

    if duplicate.is_some() {
        return Err(CreateExamError::DuplicateName(command.name.clone()));
    }

    let record = sqlx::query_as::<_, ExamRecord>(
        r#"
        INSERT INTO exams (id, business_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, business_id, name, description, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(command.business_id)
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        // Concurrent writer beat the pre-check; report it the same way.
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreateExamError::DuplicateName(command.name.clone());
            }
        }
        CreateExamError::Database(e)
    })?;

    tx.commit().await?;

    tracing::info!(exam_id = %record.id, "Exam created");

    Ok(CreateExamResponse {
        id: record.id,
        business_id: record.business_id,
        name: record.name,
        description: record.description,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str) -> CreateExamCommand {
        CreateExamCommand {
            business_id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            auth: AuthUser {
                user_id: Uuid::new_v4(),
                business_id: Some(Uuid::new_v4()),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_validate_empty_name_message() {
        let err = command("").validate().unwrap_err();
        assert_eq!(err.to_string(), "Exam name is required");
    }

    #[test]
    fn test_validate_whitespace_name_rejected() {
        assert!(command("   ").validate().is_err());
    }

    #[test]
    fn test_validate_passes() {
        assert!(command("Spring Finals 2026").validate().is_ok());
    }
}
