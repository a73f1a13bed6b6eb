//! Update batch command

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
pub struct UpdateBatchCommand {
    #[serde(skip)]
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBatchResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateBatchError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Batch end date cannot be before its start date")]
    InvalidDateRange,

    #[error("You must be an admin to update batches")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Batch not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateBatchResponse, UpdateBatchError>> for UpdateBatchCommand {}

impl crate::cqrs::middleware::Command for UpdateBatchCommand {}

impl UpdateBatchCommand {
    pub fn validate(&self) -> Result<(), UpdateBatchError> {
        if self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
        {
            return Err(UpdateBatchError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "Batch name", 256)?;
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(UpdateBatchError::InvalidDateRange);
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
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(batch_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateBatchCommand,
) -> Result<UpdateBatchResponse, UpdateBatchError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateBatchError::RoleRequired);
    }
    access::authorize_batch(&pool, &command.auth, command.id).await?;

    let record = sqlx::query_as::<_, BatchRecord>(
        r#"
        UPDATE batches
        SET name = COALESCE($2, name),
            start_date = COALESCE($3, start_date),
            end_date = COALESCE($4, end_date),
            status = COALESCE($5, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, course_id, name, start_date, end_date, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.name)
    .bind(command.start_date)
    .bind(command.end_date)
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateBatchError::NotFound)?;

    tracing::info!("Batch updated");

    Ok(UpdateBatchResponse {
        id: record.id,
        course_id: record.course_id,
        name: record.name,
        start_date: record.start_date,
        end_date: record.end_date,
        status: parse_status(&record.status)?,
        updated_at: record.updated_at,
    })
}
