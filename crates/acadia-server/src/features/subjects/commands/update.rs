//! Update subject command

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
pub struct UpdateSubjectCommand {
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
pub struct UpdateSubjectResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateSubjectError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You must be an admin to update subjects")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Subject not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateSubjectResponse, UpdateSubjectError>> for UpdateSubjectCommand {}

impl crate::cqrs::middleware::Command for UpdateSubjectCommand {}

impl UpdateSubjectCommand {
    pub fn validate(&self) -> Result<(), UpdateSubjectError> {
        if self.name.is_none() && self.description.is_none() && self.status.is_none() {
            return Err(UpdateSubjectError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "Subject name", 256)?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubjectRecord {
    id: Uuid,
    course_id: Uuid,
    name: String,
    description: Option<String>,
    status: String,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(subject_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateSubjectCommand,
) -> Result<UpdateSubjectResponse, UpdateSubjectError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateSubjectError::RoleRequired);
    }
    access::authorize_subject(&pool, &command.auth, command.id).await?;

    let record = sqlx::query_as::<_, SubjectRecord>(
        r#"
        UPDATE subjects
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            status = COALESCE($4, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, course_id, name, description, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.name)
    .bind(&command.description)
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateSubjectError::NotFound)?;

    tracing::info!("Subject updated");

    Ok(UpdateSubjectResponse {
        id: record.id,
        course_id: record.course_id,
        name: record.name,
        description: record.description,
        status: parse_status(&record.status)?,
        updated_at: record.updated_at,
    })
}
