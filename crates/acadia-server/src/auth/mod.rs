//! Authentication: Bearer JWT verification and the authenticated caller
//!
//! Tokens are verified locally (HS256) without a database round trip. The
//! `require_auth` middleware validates the `Authorization` header and inserts
//! an [`AuthUser`] extension; handlers receive it through the
//! `FromRequestParts` extractor, which rejects with 401 when absent. The
//! authenticated caller is then passed explicitly into command and query
//! handlers.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use acadia_common::Role;

use crate::api::response::AppError;
use crate::config::AuthConfig;

pub mod password;
pub mod token;

/// The authenticated caller, decoded from a Bearer token.
///
/// `Default` yields an anonymous least-privileged caller; commands carry an
/// `AuthUser` field that routes overwrite with the real caller before
/// dispatch.
#[derive(Debug, Clone, Default)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// `None` only for SUPERADMIN accounts, which are business-agnostic.
    pub business_id: Option<Uuid>,
    pub role: Role,
}

impl AuthUser {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    /// Role gate: SUPERADMIN always passes, everyone else needs at least
    /// `required`.
    pub fn require_role(&self, required: Role) -> Result<(), AppError> {
        if self.role.at_least(required) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}

/// Middleware that rejects requests without a valid Bearer token.
pub async fn require_auth(
    State(auth_config): State<AuthConfig>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Authorization header must be a Bearer token"))?;

    let user = token::validate_access_token(token, &auth_config.jwt_secret)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            business_id: (role != Role::Superadmin).then(Uuid::new_v4),
            role,
        }
    }

    #[test]
    fn test_require_role_allows_stronger() {
        assert!(caller(Role::Superadmin).require_role(Role::Admin).is_ok());
        assert!(caller(Role::Admin).require_role(Role::Admin).is_ok());
        assert!(caller(Role::Admin).require_role(Role::Teacher).is_ok());
    }

    #[test]
    fn test_require_role_rejects_weaker() {
        assert!(caller(Role::Teacher).require_role(Role::Admin).is_err());
        assert!(caller(Role::Student).require_role(Role::Teacher).is_err());
    }
}
