//! Create batch command

use chrono::{DateTime, NaiveDate, Utc};
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
pub struct CreateBatchCommand {
    /// Owning course, set from the path parameter.
    #[serde(skip)]
    pub course_id: Uuid,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatchResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateBatchError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Batch end date cannot be before its start date")]
    InvalidDateRange,

    #[error("You must be an admin to create batches")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateBatchResponse, CreateBatchError>> for CreateBatchCommand {}

impl crate::cqrs::middleware::Command for CreateBatchCommand {}

impl CreateBatchCommand {
    pub fn validate(&self) -> Result<(), CreateBatchError> {
        validate_name(&self.name, "Batch name", 256)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(CreateBatchError::InvalidDateRange);
            }
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BatchRecord {
    id: Uuid,
    course_id: Uuid,
    name: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    status: String,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(course_id = %command.course_id, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateBatchCommand,
) -> Result<CreateBatchResponse, CreateBatchError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(CreateBatchError::RoleRequired);
    }
    access::authorize_course(&pool, &command.auth, command.course_id).await?;

    let record = sqlx::query_as::<_, BatchRecord>(
        r#"
        INSERT INTO batches (id, course_id, name, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, course_id, name, start_date, end_date, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(command.course_id)
    .bind(&command.name)
    .bind(command.start_date)
    .bind(command.end_date)
    .fetch_one(&pool)
    .await?;

    tracing::info!(batch_id = %record.id, "Batch created");

    Ok(CreateBatchResponse {
        id: record.id,
        course_id: record.course_id,
        name: record.name,
        start_date: record.start_date,
        end_date: record.end_date,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateBatchCommand {
        CreateBatchCommand {
            course_id: Uuid::new_v4(),
            name: "Morning Batch A".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 12),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 30),
            auth: AuthUser::default(),
        }
    }

    #[test]
    fn test_validate_passes() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_dates() {
        let mut cmd = command();
        cmd.end_date = NaiveDate::from_ymd_opt(2025, 12, 1);
        assert!(matches!(
            cmd.validate(),
            Err(CreateBatchError::InvalidDateRange)
        ));
    }
}
