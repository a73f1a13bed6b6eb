//! Update course command

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
pub struct UpdateCourseCommand {
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
pub struct UpdateCourseResponse {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateCourseError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You must be an admin to update courses")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Course not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateCourseResponse, UpdateCourseError>> for UpdateCourseCommand {}

impl crate::cqrs::middleware::Command for UpdateCourseCommand {}

impl UpdateCourseCommand {
    pub fn validate(&self) -> Result<(), UpdateCourseError> {
        if self.name.is_none() && self.description.is_none() && self.status.is_none() {
            return Err(UpdateCourseError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "Course name", 256)?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRecord {
    id: Uuid,
    exam_id: Uuid,
    name: String,
    description: Option<String>,
    status: String,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(course_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateCourseCommand,
) -> Result<UpdateCourseResponse, UpdateCourseError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateCourseError::RoleRequired);
    }
    access::authorize_course(&pool, &command.auth, command.id).await?;

    let record = sqlx::query_as::<_, CourseRecord>(
        r#"
        UPDATE courses
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            status = COALESCE($4, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, exam_id, name, description, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.name)
    .bind(&command.description)
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateCourseError::NotFound)?;

    tracing::info!("Course updated");

    Ok(UpdateCourseResponse {
        id: record.id,
        exam_id: record.exam_id,
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
        let cmd = UpdateCourseCommand {
            id: Uuid::new_v4(),
            name: None,
            description: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(matches!(cmd.validate(), Err(UpdateCourseError::NoFieldsToUpdate)));
    }
}
