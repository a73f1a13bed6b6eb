//! Login command
//!
//! Verifies an email/password pair against the stored bcrypt hash and issues
//! a signed access token. Unknown email and wrong password produce the same
//! error so the endpoint does not leak which accounts exist.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use acadia_common::{EntityStatus, Role};

use crate::auth::password::verify_password;
use crate::auth::token::generate_access_token;
use crate::auth::AuthUser;
use crate::config::AuthConfig;

/// Command to authenticate a user by email and password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Response from a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
}

/// Errors that can occur during login
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Failed to issue token: {0}")]
    Token(#[from] crate::auth::token::TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<LoginResponse, LoginError>> for LoginCommand {}

impl crate::cqrs::middleware::Command for LoginCommand {}

impl LoginCommand {
    pub fn validate(&self) -> Result<(), LoginError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRecord {
    id: Uuid,
    business_id: Option<Uuid>,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
}

/// Handler function for login
#[tracing::instrument(skip(pool, auth_config, command), fields(email = %command.email))]
pub async fn handle(
    pool: PgPool,
    auth_config: AuthConfig,
    command: LoginCommand,
) -> Result<LoginResponse, LoginError> {
    command.validate()?;

    let record = sqlx::query_as::<_, CredentialRecord>(
        r#"
        SELECT id, business_id, name, email, password_hash, role, status
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(&command.email)
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginError::InvalidCredentials)?;

    if verify_password(&command.password, &record.password_hash).is_err() {
        tracing::info!(user_id = %record.id, "Login rejected: wrong password");
        return Err(LoginError::InvalidCredentials);
    }

    let status = record
        .status
        .parse::<EntityStatus>()
        .map_err(|e| sqlx::Error::Decode(e.into()))?;
    if status != EntityStatus::Active {
        tracing::info!(user_id = %record.id, "Login rejected: inactive account");
        return Err(LoginError::AccountInactive);
    }

    let role = record
        .role
        .parse::<Role>()
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    let user = AuthUser {
        user_id: record.id,
        business_id: record.business_id,
        role,
    };
    let token = generate_access_token(&user, &auth_config.jwt_secret, auth_config.token_ttl_hours)?;

    tracing::info!(user_id = %record.id, role = %role, "Login succeeded");

    Ok(LoginResponse {
        token,
        user: LoginUser {
            id: record.id,
            name: record.name,
            email: record.email,
            role,
            business_id: record.business_id,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_credentials() {
        let cmd = LoginCommand {
            email: "".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            cmd.validate(),
            Err(LoginError::MissingCredentials)
        ));

        let cmd = LoginCommand {
            email: "admin@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_credentials() {
        let cmd = LoginCommand {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(cmd.validate().is_ok());
    }
}
