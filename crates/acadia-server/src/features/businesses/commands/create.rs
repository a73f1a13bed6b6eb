//! Create business command
//!
//! Only SUPERADMIN may create tenants. The command carries the authenticated
//! caller; routes overwrite the `auth` field before dispatch.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::parse_status;
use crate::features::shared::validation::{
    validate_email, validate_name, EmailValidationError, NameValidationError,
};

/// Command to create a new business (tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessCommand {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Authenticated caller, injected by the route handler.
    #[serde(skip)]
    pub auth: AuthUser,
}

/// Response from creating a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a business
#[derive(Debug, thiserror::Error)]
pub enum CreateBusinessError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("{0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("Only a superadmin can create a business")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateBusinessResponse, CreateBusinessError>> for CreateBusinessCommand {}

impl crate::cqrs::middleware::Command for CreateBusinessCommand {}

impl CreateBusinessCommand {
    pub fn validate(&self) -> Result<(), CreateBusinessError> {
        validate_name(&self.name, "Business name", 256)?;
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BusinessRecord {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

/// Handler function for creating businesses
#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateBusinessCommand,
) -> Result<CreateBusinessResponse, CreateBusinessError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Superadmin) {
        return Err(CreateBusinessError::Forbidden);
    }

    tracing::info!("Creating business");

    let record = sqlx::query_as::<_, BusinessRecord>(
        r#"
        INSERT INTO businesses (id, name, email, phone, address)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, phone, address, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&command.name)
    .bind(&command.email)
    .bind(&command.phone)
    .bind(&command.address)
    .fetch_one(&pool)
    .await?;

    Ok(CreateBusinessResponse {
        id: record.id,
        name: record.name,
        email: record.email,
        phone: record.phone,
        address: record.address,
        status: parse_status(&record.status)?,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(role: Role) -> CreateBusinessCommand {
        CreateBusinessCommand {
            name: "Northside Academy".to_string(),
            email: Some("office@northside.edu".to_string()),
            phone: None,
            address: None,
            auth: AuthUser {
                user_id: Uuid::new_v4(),
                business_id: None,
                role,
            },
        }
    }

    #[test]
    fn test_validate_requires_name() {
        let mut cmd = command(Role::Superadmin);
        cmd.name = "  ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateBusinessError::NameValidation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut cmd = command(Role::Superadmin);
        cmd.email = Some("not-an-email".to_string());
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_validate_passes() {
        assert!(command(Role::Superadmin).validate().is_ok());
    }
}
