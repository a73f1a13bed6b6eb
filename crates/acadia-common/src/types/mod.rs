//! Shared domain types
//!
//! Roles and statuses are stored as TEXT in the database and travel through
//! the API as uppercase strings, so both enums round-trip via `FromStr` and
//! `Display` in addition to serde.

use serde::{Deserialize, Serialize};

use crate::error::AcadiaError;

/// Coarse access role attached to every user account.
///
/// Roles are totally ordered: `SUPERADMIN > ADMIN > TEACHER > STUDENT > USER`.
/// SUPERADMIN accounts are business-agnostic; every other role belongs to
/// exactly one business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Superadmin,
    Admin,
    Teacher,
    Student,
    /// Least-privileged role, the default for new accounts.
    #[default]
    User,
}

impl Role {
    /// Numeric rank used for "at least this role" checks. Higher is stronger.
    pub fn rank(self) -> u8 {
        match self {
            Role::Superadmin => 4,
            Role::Admin => 3,
            Role::Teacher => 2,
            Role::Student => 1,
            Role::User => 0,
        }
    }

    /// Whether this role is at least as privileged as `other`.
    pub fn at_least(self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "SUPERADMIN",
            Role::Admin => "ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
            Role::User => "USER",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AcadiaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUPERADMIN" => Ok(Role::Superadmin),
            "ADMIN" => Ok(Role::Admin),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            "USER" => Ok(Role::User),
            other => Err(AcadiaError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Soft-deletion status carried by every tenant-owned entity.
///
/// Deleting flips the status to INACTIVE instead of removing the row;
/// fetch-by-id still returns INACTIVE rows unless a listing filters them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
}

impl EntityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityStatus::Active => "ACTIVE",
            EntityStatus::Inactive => "INACTIVE",
        }
    }
}

impl std::str::FromStr for EntityStatus {
    type Err = AcadiaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(EntityStatus::Active),
            "INACTIVE" => Ok(EntityStatus::Inactive),
            other => Err(AcadiaError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Superadmin, Role::Admin, Role::Teacher, Role::Student, Role::User] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("SuperAdmin".parse::<Role>().unwrap(), Role::Superadmin);
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Superadmin.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(!Role::Teacher.at_least(Role::Admin));
        assert!(!Role::User.at_least(Role::Student));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("ACTIVE".parse::<EntityStatus>().unwrap(), EntityStatus::Active);
        assert_eq!("inactive".parse::<EntityStatus>().unwrap(), EntityStatus::Inactive);
        assert!("DELETED".parse::<EntityStatus>().is_err());
    }

    #[test]
    fn test_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"TEACHER\"");
        assert_eq!(
            serde_json::from_str::<EntityStatus>("\"INACTIVE\"").unwrap(),
            EntityStatus::Inactive
        );
    }
}
