//! Utilities shared by all feature slices

use acadia_common::{AcadiaError, EntityStatus, Role};

pub mod access;
pub mod pagination;
pub mod validation;

/// Decode a TEXT status column. A value outside ACTIVE/INACTIVE means the
/// row is corrupt, which surfaces as a decode-level database error.
pub fn parse_status(raw: &str) -> Result<EntityStatus, sqlx::Error> {
    raw.parse()
        .map_err(|e: AcadiaError| sqlx::Error::Decode(e.into()))
}

/// Decode a TEXT role column.
pub fn parse_role(raw: &str) -> Result<Role, sqlx::Error> {
    raw.parse()
        .map_err(|e: AcadiaError| sqlx::Error::Decode(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("ACTIVE").unwrap(), EntityStatus::Active);
        assert!(parse_status("GONE").is_err());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("TEACHER").unwrap(), Role::Teacher);
        assert!(parse_role("JANITOR").is_err());
    }
}
