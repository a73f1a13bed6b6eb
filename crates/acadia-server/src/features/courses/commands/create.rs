//! Create course command

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
pub struct CreateCourseCommand {
    /// Owning exam, set from the path parameter.
    #[serde(skip)]
    pub exam_id: Uuid,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseResponse {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateCourseError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You must be an admin to create courses")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateCourseResponse, CreateCourseError>> for CreateCourseCommand {}

impl crate::cqrs::middleware::Command for CreateCourseCommand {}

impl CreateCourseCommand {
    pub fn validate(&self) -> Result<(), CreateCourseError> {
        validate_name(&self.name, "Course name", 256)?;
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
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(exam_id = %command.exam_id, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateCourseCommand,
) -> Result<CreateCourseResponse, CreateCourseError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(CreateCourseError::RoleRequired);
    }
    access::authorize_exam(&pool, &command.auth, command.exam_id).await?;

    let record = sqlx::query_as::<_, CourseRecord>(
        r#"
        INSERT INTO courses (id, exam_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, exam_id, name, description, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(command.exam_id)
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&pool)
    .await?;

    tracing::info!(course_id = %record.id, "Course created");

    Ok(CreateCourseResponse {
        id: record.id,
        exam_id: record.exam_id,
        name: record.name,
        description: record.description,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name() {
        let cmd = CreateCourseCommand {
            exam_id: Uuid::new_v4(),
            name: String::new(),
            description: None,
            auth: AuthUser::default(),
        };
        let err = cmd.validate().unwrap_err();
        assert_eq!(err.to_string(), "Course name is required");
    }
}
