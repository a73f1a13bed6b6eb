//! Hierarchical access authorization
//!
//! Every resource in the system transitively belongs to exactly one business:
//! content -> batch -> course -> exam -> business. The resolvers here walk
//! that ownership chain one foreign key at a time and compare the owning
//! business against the authenticated caller.
//!
//! Two rules, applied everywhere:
//! - SUPERADMIN passes every tenant check; everyone else must belong to the
//!   resolved business.
//! - A missing resource at any hop is reported as that entity's NotFound,
//!   never collapsed into Forbidden.

use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::AppError;
use crate::auth::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Business not found")]
    BusinessNotFound,

    #[error("Exam not found")]
    ExamNotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Subject not found")]
    SubjectNotFound,

    #[error("Batch not found")]
    BatchNotFound,

    #[error("Content not found")]
    ContentNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Announcement not found")]
    AnnouncementNotFound,

    #[error("You do not have access to this resource")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Forbidden => AppError::Forbidden(err.to_string()),
            AccessError::Database(e) => AppError::Database(e),
            other => AppError::NotFound(other.to_string()),
        }
    }
}

/// Tenant check against a resolved owning business.
pub fn check_tenant(auth: &AuthUser, owner: Uuid) -> Result<(), AccessError> {
    if auth.is_superadmin() || auth.business_id == Some(owner) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

/// Tenant check where the owner may be absent (SUPERADMIN user rows).
/// A business-less resource is reachable only by SUPERADMIN callers.
pub fn check_tenant_opt(auth: &AuthUser, owner: Option<Uuid>) -> Result<(), AccessError> {
    if auth.is_superadmin() {
        return Ok(());
    }
    match owner {
        Some(owner) if auth.business_id == Some(owner) => Ok(()),
        _ => Err(AccessError::Forbidden),
    }
}

/// Verify a business exists and the caller may act within it.
pub async fn authorize_business(
    pool: &PgPool,
    auth: &AuthUser,
    business_id: Uuid,
) -> Result<(), AccessError> {
    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM businesses WHERE id = $1")
        .bind(business_id)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Err(AccessError::BusinessNotFound);
    }

    check_tenant(auth, business_id)
}

/// Resolve an exam's owning business and authorize the caller against it.
pub async fn authorize_exam(
    pool: &PgPool,
    auth: &AuthUser,
    exam_id: Uuid,
) -> Result<Uuid, AccessError> {
    let business_id =
        sqlx::query_scalar::<_, Uuid>("SELECT business_id FROM exams WHERE id = $1")
            .bind(exam_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AccessError::ExamNotFound)?;

    check_tenant(auth, business_id)?;
    Ok(business_id)
}

/// Resolve a course's owning business (course -> exam -> business).
pub async fn authorize_course(
    pool: &PgPool,
    auth: &AuthUser,
    course_id: Uuid,
) -> Result<Uuid, AccessError> {
    let exam_id = sqlx::query_scalar::<_, Uuid>("SELECT exam_id FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AccessError::CourseNotFound)?;

    authorize_exam(pool, auth, exam_id).await
}

/// Resolve a subject's owning business (subject -> course -> exam -> business).
pub async fn authorize_subject(
    pool: &PgPool,
    auth: &AuthUser,
    subject_id: Uuid,
) -> Result<Uuid, AccessError> {
    let course_id =
        sqlx::query_scalar::<_, Uuid>("SELECT course_id FROM subjects WHERE id = $1")
            .bind(subject_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AccessError::SubjectNotFound)?;

    authorize_course(pool, auth, course_id).await
}

/// Resolve a batch's owning business (batch -> course -> exam -> business).
pub async fn authorize_batch(
    pool: &PgPool,
    auth: &AuthUser,
    batch_id: Uuid,
) -> Result<Uuid, AccessError> {
    let course_id = sqlx::query_scalar::<_, Uuid>("SELECT course_id FROM batches WHERE id = $1")
        .bind(batch_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AccessError::BatchNotFound)?;

    authorize_course(pool, auth, course_id).await
}

/// Resolve a content's owning business (content -> batch -> ... -> business).
pub async fn authorize_content(
    pool: &PgPool,
    auth: &AuthUser,
    content_id: Uuid,
) -> Result<Uuid, AccessError> {
    let batch_id = sqlx::query_scalar::<_, Uuid>("SELECT batch_id FROM contents WHERE id = $1")
        .bind(content_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AccessError::ContentNotFound)?;

    authorize_batch(pool, auth, batch_id).await
}

/// Resolve a user's owning business and authorize the caller against it.
///
/// Target SUPERADMIN accounts have no business; only SUPERADMIN callers may
/// act on them.
pub async fn authorize_user(
    pool: &PgPool,
    auth: &AuthUser,
    user_id: Uuid,
) -> Result<Option<Uuid>, AccessError> {
    let business_id =
        sqlx::query_scalar::<_, Option<Uuid>>("SELECT business_id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AccessError::UserNotFound)?;

    check_tenant_opt(auth, business_id)?;
    Ok(business_id)
}

/// Resolve an announcement's owning business and authorize the caller.
pub async fn authorize_announcement(
    pool: &PgPool,
    auth: &AuthUser,
    announcement_id: Uuid,
) -> Result<Uuid, AccessError> {
    let business_id =
        sqlx::query_scalar::<_, Uuid>("SELECT business_id FROM announcements WHERE id = $1")
            .bind(announcement_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AccessError::AnnouncementNotFound)?;

    check_tenant(auth, business_id)?;
    Ok(business_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acadia_common::Role;

    fn caller(role: Role, business_id: Option<Uuid>) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            business_id,
            role,
        }
    }

    #[test]
    fn test_check_tenant_superadmin_always_passes() {
        let auth = caller(Role::Superadmin, None);
        assert!(check_tenant(&auth, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_check_tenant_matching_business() {
        let business = Uuid::new_v4();
        let auth = caller(Role::Admin, Some(business));
        assert!(check_tenant(&auth, business).is_ok());
    }

    #[test]
    fn test_check_tenant_foreign_business_forbidden() {
        let auth = caller(Role::Admin, Some(Uuid::new_v4()));
        assert!(matches!(
            check_tenant(&auth, Uuid::new_v4()),
            Err(AccessError::Forbidden)
        ));
    }

    #[test]
    fn test_check_tenant_opt_businessless_target() {
        // Only SUPERADMIN may touch a business-less (SUPERADMIN) user row.
        let superadmin = caller(Role::Superadmin, None);
        assert!(check_tenant_opt(&superadmin, None).is_ok());

        let admin = caller(Role::Admin, Some(Uuid::new_v4()));
        assert!(matches!(
            check_tenant_opt(&admin, None),
            Err(AccessError::Forbidden)
        ));
    }

    #[test]
    fn test_not_found_maps_to_404_not_403() {
        let err: AppError = AccessError::CourseNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = AccessError::Forbidden.into();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
