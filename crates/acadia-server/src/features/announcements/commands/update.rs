//! Update announcement command

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
pub struct UpdateAnnouncementCommand {
    #[serde(skip)]
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnnouncementResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateAnnouncementError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    Validation(#[from] NameValidationError),

    #[error("You must be an admin to update announcements")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Announcement not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateAnnouncementResponse, UpdateAnnouncementError>>
    for UpdateAnnouncementCommand
{
}

impl crate::cqrs::middleware::Command for UpdateAnnouncementCommand {}

impl UpdateAnnouncementCommand {
    pub fn validate(&self) -> Result<(), UpdateAnnouncementError> {
        if self.title.is_none() && self.body.is_none() && self.status.is_none() {
            return Err(UpdateAnnouncementError::NoFieldsToUpdate);
        }
        if let Some(ref title) = self.title {
            validate_name(title, "Announcement title", 256)?;
        }
        if let Some(ref body) = self.body {
            validate_name(body, "Announcement body", 10_000)?;
        }
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
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(announcement_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateAnnouncementCommand,
) -> Result<UpdateAnnouncementResponse, UpdateAnnouncementError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateAnnouncementError::RoleRequired);
    }
    access::authorize_announcement(&pool, &command.auth, command.id).await?;

    let record = sqlx::query_as::<_, AnnouncementRecord>(
        r#"
        UPDATE announcements
        SET title = COALESCE($2, title),
            body = COALESCE($3, body),
            status = COALESCE($4, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, business_id, title, body, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.title)
    .bind(&command.body)
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateAnnouncementError::NotFound)?;

    tracing::info!("Announcement updated");

    Ok(UpdateAnnouncementResponse {
        id: record.id,
        business_id: record.business_id,
        title: record.title,
        body: record.body,
        status: parse_status(&record.status)?,
        updated_at: record.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_update() {
        let cmd = UpdateAnnouncementCommand {
            id: Uuid::new_v4(),
            title: None,
            body: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(matches!(cmd.validate(), Err(UpdateAnnouncementError::NoFieldsToUpdate)));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let cmd = UpdateAnnouncementCommand {
            id: Uuid::new_v4(),
            title: Some("  ".to_string()),
            body: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(cmd.validate().is_err());
    }
}
