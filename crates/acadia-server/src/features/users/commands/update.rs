//! Update user command
//!
//! Partial update of profile fields, role, and status. Role changes are
//! capped at the caller's own role.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::validation::{
    validate_email, validate_mobile, validate_name, EmailValidationError, MobileValidationError,
    NameValidationError,
};
use crate::features::shared::{parse_role, parse_status};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    #[serde(skip)]
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    pub id: Uuid,
    pub business_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub role: Role,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateUserError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("{0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("{0}")]
    MobileValidation(#[from] MobileValidationError),

    #[error("You must be an admin to update users")]
    RoleRequired,

    #[error("Cannot assign a role above your own")]
    RoleEscalation,

    #[error("Superadmin accounts cannot belong to a business")]
    SuperadminRole,

    #[error("A user with this email or mobile already exists")]
    Duplicate,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateUserResponse, UpdateUserError>> for UpdateUserCommand {}

impl crate::cqrs::middleware::Command for UpdateUserCommand {}

impl UpdateUserCommand {
    pub fn validate(&self) -> Result<(), UpdateUserError> {
        if self.name.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.role.is_none()
            && self.status.is_none()
        {
            return Err(UpdateUserError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "Name", 256)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        if let Some(ref mobile) = self.mobile {
            validate_mobile(mobile)?;
        }
        // Users managed here are tenant-bound; promotion to the
        // business-agnostic superadmin role is not allowed.
        if self.role == Some(Role::Superadmin) {
            return Err(UpdateUserError::SuperadminRole);
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    business_id: Option<Uuid>,
    name: String,
    email: String,
    mobile: Option<String>,
    role: String,
    status: String,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateUserCommand,
) -> Result<UpdateUserResponse, UpdateUserError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateUserError::RoleRequired);
    }
    if let Some(role) = command.role {
        if role.rank() > command.auth.role.rank() {
            return Err(UpdateUserError::RoleEscalation);
        }
    }
    access::authorize_user(&pool, &command.auth, command.id).await?;

    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            mobile = COALESCE($4, mobile),
            role = COALESCE($5, role),
            status = COALESCE($6, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, business_id, name, email, mobile, role, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.name)
    .bind(&command.email)
    .bind(&command.mobile)
    .bind(command.role.map(|r| r.as_str()))
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return UpdateUserError::Duplicate;
            }
        }
        UpdateUserError::Database(e)
    })?
    .ok_or(UpdateUserError::NotFound)?;

    tracing::info!("User updated");

    Ok(UpdateUserResponse {
        id: record.id,
        business_id: record.business_id,
        name: record.name,
        email: record.email,
        mobile: record.mobile,
        role: parse_role(&record.role)?,
        status: parse_status(&record.status)?,
        updated_at: record.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_update() {
        let cmd = UpdateUserCommand {
            id: Uuid::new_v4(),
            name: None,
            email: None,
            mobile: None,
            role: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(matches!(cmd.validate(), Err(UpdateUserError::NoFieldsToUpdate)));
    }

    #[test]
    fn test_validate_rejects_promotion_to_superadmin() {
        let cmd = UpdateUserCommand {
            id: Uuid::new_v4(),
            name: None,
            email: None,
            mobile: None,
            role: Some(Role::Superadmin),
            status: None,
            auth: AuthUser {
                user_id: Uuid::new_v4(),
                business_id: None,
                role: Role::Superadmin,
            },
        };
        assert!(matches!(cmd.validate(), Err(UpdateUserError::SuperadminRole)));
    }
}
