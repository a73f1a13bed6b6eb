//! Update business command
//!
//! Partial update: only fields present in the body change. Requires ADMIN
//! within the business, or SUPERADMIN.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};
use crate::features::shared::parse_status;
use crate::features::shared::validation::{
    validate_email, validate_name, EmailValidationError, NameValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBusinessCommand {
    /// Set from the path parameter, not the body.
    #[serde(skip)]
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBusinessResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: EntityStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateBusinessError {
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("{0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("You must be an admin to update a business")]
    RoleRequired,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Business not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateBusinessResponse, UpdateBusinessError>> for UpdateBusinessCommand {}

impl crate::cqrs::middleware::Command for UpdateBusinessCommand {}

impl UpdateBusinessCommand {
    pub fn validate(&self) -> Result<(), UpdateBusinessError> {
        if self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.status.is_none()
        {
            return Err(UpdateBusinessError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name(name, "Business name", 256)?;
        }
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
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(business_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateBusinessCommand,
) -> Result<UpdateBusinessResponse, UpdateBusinessError> {
    command.validate()?;

    if !command.auth.role.at_least(Role::Admin) {
        return Err(UpdateBusinessError::RoleRequired);
    }
    access::authorize_business(&pool, &command.auth, command.id).await?;

    let record = sqlx::query_as::<_, BusinessRecord>(
        r#"
        UPDATE businesses
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            address = COALESCE($5, address),
            status = COALESCE($6, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, email, phone, address, status, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&command.name)
    .bind(&command.email)
    .bind(&command.phone)
    .bind(&command.address)
    .bind(command.status.map(|s| s.as_str()))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateBusinessError::NotFound)?;

    tracing::info!("Business updated");

    Ok(UpdateBusinessResponse {
        id: record.id,
        name: record.name,
        email: record.email,
        phone: record.phone,
        address: record.address,
        status: parse_status(&record.status)?,
        updated_at: record.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_update() {
        let cmd = UpdateBusinessCommand {
            id: Uuid::new_v4(),
            name: None,
            email: None,
            phone: None,
            address: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(matches!(
            cmd.validate(),
            Err(UpdateBusinessError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_validate_accepts_partial_update() {
        let cmd = UpdateBusinessCommand {
            id: Uuid::new_v4(),
            name: Some("Renamed Academy".to_string()),
            email: None,
            phone: None,
            address: None,
            status: None,
            auth: AuthUser::default(),
        };
        assert!(cmd.validate().is_ok());
    }
}
