//! List a user's granted permissions

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::features::shared::access::{self, AccessError};

use super::list::{PermissionRecord, PermissionResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUserPermissionsQuery {
    pub user_id: Uuid,

    #[serde(skip)]
    pub auth: AuthUser,
}

#[derive(Debug, thiserror::Error)]
pub enum ListUserPermissionsError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<PermissionResponse>, ListUserPermissionsError>>
    for ListUserPermissionsQuery
{
}

impl crate::cqrs::middleware::Query for ListUserPermissionsQuery {}

#[tracing::instrument(skip(pool, query), fields(user_id = %query.user_id))]
pub async fn handle(
    pool: PgPool,
    query: ListUserPermissionsQuery,
) -> Result<Vec<PermissionResponse>, ListUserPermissionsError> {
    access::authorize_user(&pool, &query.auth, query.user_id).await?;

    let records = sqlx::query_as::<_, PermissionRecord>(
        r#"
        SELECT p.id, p.code, p.description, p.created_at
        FROM permissions p
        JOIN role_permissions rp ON rp.permission_id = p.id
        WHERE rp.user_id = $1
        ORDER BY p.code
        "#,
    )
    .bind(query.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(records
        .into_iter()
        .map(PermissionRecord::into_response)
        .collect())
}
