//! Create subject command

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
pub struct CreateSubjectCommand {
    /// Owning course, set from the path parameter.
    #[serde(skip)]
    pub course_id: Uuid,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubjectResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateSubjectError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You must be an admin to create subjects")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateSubjectResponse, CreateSubjectError>> for CreateSubjectCommand {}

impl crate::cqrs::middleware::Command for CreateSubjectCommand {}

impl CreateSubjectCommand {
    pub fn validate(&self) -> Result<(), CreateSubjectError> {
        validate_name(&self.name, "Subject name", 256)?;
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
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(course_id = %command.course_id, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateSubjectCommand,
) -> Result<CreateSubjectResponse, CreateSubjectError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(CreateSubjectError::RoleRequired);
    }
    access::authorize_course(&pool, &command.auth, command.course_id).await?;

    let record = sqlx::query_as::<_, SubjectRecord>(
        r#"
        INSERT INTO subjects (id, course_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, course_id, name, description, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(command.course_id)
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&pool)
    .await?;

    tracing::info!(subject_id = %record.id, "Subject created");

    Ok(CreateSubjectResponse {
        id: record.id,
        course_id: record.course_id,
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
        let cmd = CreateSubjectCommand {
            course_id: Uuid::new_v4(),
            name: String::new(),
            description: None,
            auth: AuthUser::default(),
        };
        let err = cmd.validate().unwrap_err();
        assert_eq!(err.to_string(), "Subject name is required");
    }
}
