//! Create announcement command

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

/// Command to post an announcement to a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAnnouncementCommand {
    /// Owning business, set from the path parameter.
    #[serde(skip)]
    pub business_id: Uuid,

    pub title: String,

    pub body: String,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAnnouncementResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateAnnouncementError {
    #[error("{0}")]
    Validation(#[from] NameValidationError),

    #[error("You must be an admin to post announcements")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateAnnouncementResponse, CreateAnnouncementError>>
    for CreateAnnouncementCommand
{
}

impl crate::cqrs::middleware::Command for CreateAnnouncementCommand {}

impl CreateAnnouncementCommand {
    pub fn validate(&self) -> Result<(), CreateAnnouncementError> {
        validate_name(&self.title, "Announcement title", 256)?;
        validate_name(&self.body, "Announcement body", 10_000)?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AnnouncementRecord {
    id: Uuid,
    business_id: Uuid,
    title: String,
    body: String,
    status: String,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(
    skip(pool, command),
    fields(business_id = %command.business_id, title = %command.title)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateAnnouncementCommand,
) -> Result<CreateAnnouncementResponse, CreateAnnouncementError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(CreateAnnouncementError::RoleRequired);
    }
    access::authorize_business(&pool, &command.auth, command.business_id).await?;

    let record = sqlx::query_as::<_, AnnouncementRecord>(
        r#"
        INSERT INTO announcements (id, business_id, title, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id, business_id, title, body, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(command.business_id)
    .bind(&command.title)
    .bind(&command.body)
    .fetch_one(&pool)
    .await?;

    tracing::info!(announcement_id = %record.id, "Announcement posted");

    Ok(CreateAnnouncementResponse {
        id: record.id,
        business_id: record.business_id,
        title: record.title,
        body: record.body,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(title: &str, body: &str) -> CreateAnnouncementCommand {
        CreateAnnouncementCommand {
            business_id: Uuid::new_v4(),
            title: title.to_string(),
            body: body.to_string(),
            auth: AuthUser {
                user_id: Uuid::new_v4(),
                business_id: Some(Uuid::new_v4()),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_validate_empty_title_message() {
        let err = command("", "Body text").validate().unwrap_err();
        assert_eq!(err.to_string(), "Announcement title is required");
    }

    #[test]
    fn test_validate_empty_body_rejected() {
        assert!(command("Holiday schedule", "").validate().is_err());
    }

    #[test]
    fn test_validate_passes() {
        assert!(command("Holiday schedule", "Campus closes Friday.").validate().is_ok());
    }
}
