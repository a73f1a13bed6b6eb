//! Authentication API routes
//!
//! - `POST /api/v1/auth/login` - Exchange email/password for a Bearer token
//!
//! Login is the only unauthenticated route under `/api/v1`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::config::AuthConfig;
use crate::features::AppState;

use super::commands::{login, LoginCommand, LoginError};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login_handler))
}

/// Authenticate and issue an access token
///
/// # Response
///
/// - `200 OK` - Token issued
/// - `400 Bad Request` - Missing email or password
/// - `401 Unauthorized` - Unknown email or wrong password
/// - `403 Forbidden` - Account is INACTIVE
#[tracing::instrument(skip(pool, auth_config, command), fields(email = %command.email))]
async fn login_handler(
    State(pool): State<PgPool>,
    State(auth_config): State<AuthConfig>,
    Json(command): Json<LoginCommand>,
) -> Result<Response, AuthApiError> {
    let response = login::handle(pool, auth_config, command).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Login successful", response)),
    )
        .into_response())
}

#[derive(Debug)]
enum AuthApiError {
    Login(LoginError),
}

impl From<LoginError> for AuthApiError {
    fn from(err: LoginError) -> Self {
        Self::Login(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let Self::Login(err) = self;
        let (status, code, message) = match &err {
            LoginError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            },
            LoginError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string())
            },
            LoginError::AccountInactive => (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string()),
            LoginError::Token(_) | LoginError::Database(_) => {
                tracing::error!("Login failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let response = AuthApiError::Login(LoginError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_inactive_account_maps_to_403() {
        let response = AuthApiError::Login(LoginError::AccountInactive).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
