//! Create user command
//!
//! Requires ADMIN within the target business (SUPERADMIN passes). The
//! password is bcrypt-hashed before the row is written; a duplicate email or
//! mobile is reported as an explicit conflict rather than a raw database
//! error.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::password::{hash_password, PasswordError};
use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::validation::{
    validate_email, validate_mobile, validate_name, EmailValidationError, MobileValidationError,
    NameValidationError,
};
use crate::features::shared::{parse_role, parse_status};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    /// Target business, set from the path parameter.
    #[serde(skip)]
    pub business_id: Uuid,

    pub name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    pub password: String,

    #[serde(default)]
    pub role: Role,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub id: Uuid,
    pub business_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub role: Role,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("{0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("{0}")]
    MobileValidation(#[from] MobileValidationError),

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("You must be an admin to create users")]
    RoleRequired,

    #[error("Cannot create a user with a role above your own")]
    RoleEscalation,

    #[error("Superadmin accounts cannot belong to a business")]
    SuperadminRole,

    #[error("A user with this email or mobile already exists")]
    Duplicate,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Failed to hash password: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateUserResponse, CreateUserError>> for CreateUserCommand {}

impl crate::cqrs::middleware::Command for CreateUserCommand {}

impl CreateUserCommand {
    pub fn validate(&self) -> Result<(), CreateUserError> {
        validate_name(&self.name, "Name", 256)?;
        validate_email(&self.email)?;
        if let Some(ref mobile) = self.mobile {
            validate_mobile(mobile)?;
        }
        if self.password.len() < 8 {
            return Err(CreateUserError::WeakPassword);
        }
        // This endpoint always pins the new user to a business, and a
        // superadmin account must not carry one.
        if self.role == Role::Superadmin {
            return Err(CreateUserError::SuperadminRole);
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
    created_at: DateTime<Utc>,
}

#[tracing::instrument(
    skip(pool, command),
    fields(business_id = %command.business_id, email = %command.email)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateUserCommand,
) -> Result<CreateUserResponse, CreateUserError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(CreateUserError::RoleRequired);
    }
    // An admin cannot mint accounts stronger than their own.
    if command.role.rank() > command.auth.role.rank() {
        return Err(CreateUserError::RoleEscalation);
    }
    access::authorize_business(&pool, &command.auth, command.business_id).await?;

    let password_hash = hash_password(&command.password)?;

    tracing::info!("Creating user");

    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (id, business_id, name, email, mobile, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, business_id, name, email, mobile, role, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(command.business_id)
    .bind(&command.name)
    .bind(&command.email)
    .bind(&command.mobile)
    .bind(&password_hash)
    .bind(command.role.as_str())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreateUserError::Duplicate;
            }
        }
        CreateUserError::Database(e)
    })?;

    Ok(CreateUserResponse {
        id: record.id,
        business_id: record.business_id,
        name: record.name,
        email: record.email,
        mobile: record.mobile,
        role: parse_role(&record.role)?,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateUserCommand {
        CreateUserCommand {
            business_id: Uuid::new_v4(),
            name: "Priya Shah".to_string(),
            email: "priya@northside.edu".to_string(),
            mobile: Some("+915551234567".to_string()),
            password: "correct horse battery".to_string(),
            role: Role::Teacher,
            auth: AuthUser {
                user_id: Uuid::new_v4(),
                business_id: None,
                role: Role::Superadmin,
            },
        }
    }

    #[test]
    fn test_validate_passes() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_password() {
        let mut cmd = command();
        cmd.password = "short".to_string();
        assert!(matches!(cmd.validate(), Err(CreateUserError::WeakPassword)));
    }

    // Even a superadmin caller cannot mint a tenant-bound superadmin.
    #[test]
    fn test_validate_rejects_superadmin_target() {
        let mut cmd = command();
        cmd.role = Role::Superadmin;
        assert!(matches!(
            cmd.validate(),
            Err(CreateUserError::SuperadminRole)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_mobile() {
        let mut cmd = command();
        cmd.mobile = Some("call me".to_string());
        assert!(matches!(
            cmd.validate(),
            Err(CreateUserError::MobileValidation(_))
        ));
    }
}
