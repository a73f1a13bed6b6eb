//! Access token encoding and validation (HS256 JWT)

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time;
use uuid::Uuid;

use acadia_common::Role;

use super::AuthUser;

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Owning business; `None` for SUPERADMIN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
    /// Coarse role, uppercase.
    pub role: Role,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("System clock error")]
    Clock,

    #[error("Token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Invalid,
}

/// Issue an access token for the given caller.
pub fn generate_access_token(
    user: &AuthUser,
    secret: &str,
    ttl_hours: u64,
) -> Result<String, TokenError> {
    let exp = time::SystemTime::now()
        .duration_since(time::UNIX_EPOCH)
        .map_err(|_| TokenError::Clock)?
        .as_secs()
        + 3600 * ttl_hours;

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: user.user_id,
            business_id: user.business_id,
            role: user.role,
            exp,
        },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Encode)
}

/// Verify a token signature and expiry, yielding the authenticated caller.
pub fn validate_access_token(token: &str, secret: &str) -> Result<AuthUser, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| TokenError::Invalid)?;

    Ok(AuthUser {
        user_id: token_data.claims.sub,
        business_id: token_data.claims.business_id,
        role: token_data.claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            business_id: Some(Uuid::new_v4()),
            role: Role::Admin,
        };

        let token = generate_access_token(&user, SECRET, 1).unwrap();
        let decoded = validate_access_token(&token, SECRET).unwrap();

        assert_eq!(decoded.user_id, user.user_id);
        assert_eq!(decoded.business_id, user.business_id);
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn test_superadmin_token_has_no_business() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            business_id: None,
            role: Role::Superadmin,
        };

        let token = generate_access_token(&user, SECRET, 1).unwrap();
        let decoded = validate_access_token(&token, SECRET).unwrap();
        assert!(decoded.business_id.is_none());
        assert_eq!(decoded.role, Role::Superadmin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            business_id: None,
            role: Role::User,
        };

        let token = generate_access_token(&user, SECRET, 1).unwrap();
        assert!(matches!(
            validate_access_token(&token, "other-secret"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            validate_access_token("not.a.jwt", SECRET),
            Err(TokenError::Invalid)
        ));
    }
}
