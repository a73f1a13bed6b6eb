//! Shared validation utilities
//!
//! Common validation functions for input data across commands and queries.

use thiserror::Error;

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be between 1 and {max_length} characters")]
    TooLong { field: String, max_length: usize },
}

/// Errors that can occur during email validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("Email is required")]
    Required,

    #[error("Email address is invalid")]
    InvalidFormat,
}

/// Errors that can occur during mobile number validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MobileValidationError {
    #[error("Mobile number must be 7 to 15 digits, optionally prefixed with +")]
    InvalidFormat,
}

/// Validate a required name-like field
///
/// # Rules
/// - Must not be empty (after trimming whitespace)
/// - Must not exceed `max_length` characters
///
/// The `field` label is interpolated into the error message, so commands can
/// report e.g. "Exam name is required".
pub fn validate_name(
    name: &str,
    field: &str,
    max_length: usize,
) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > max_length {
        return Err(NameValidationError::TooLong {
            field: field.to_string(),
            max_length,
        });
    }

    Ok(())
}

/// Validate an email address
///
/// Deliberately permissive: one `@` with a dot somewhere after it. The
/// database unique constraint is the real gatekeeper for duplicates.
pub fn validate_email(email: &str) -> Result<(), EmailValidationError> {
    if email.trim().is_empty() {
        return Err(EmailValidationError::Required);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(EmailValidationError::InvalidFormat);
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(EmailValidationError::InvalidFormat);
    }

    Ok(())
}

/// Validate a mobile number: 7-15 digits, optional leading `+`.
pub fn validate_mobile(mobile: &str) -> Result<(), MobileValidationError> {
    let digits = mobile.strip_prefix('+').unwrap_or(mobile);

    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(MobileValidationError::InvalidFormat);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_valid() {
        assert!(validate_name("Final Exam 2026", "Exam name", 256).is_ok());
        assert!(validate_name("a", "Name", 256).is_ok());
    }

    #[test]
    fn test_validate_name_empty() {
        let err = validate_name("", "Exam name", 256).unwrap_err();
        assert_eq!(err.to_string(), "Exam name is required");

        assert!(validate_name("   ", "Name", 256).is_err());
    }

    #[test]
    fn test_validate_name_too_long() {
        let long = "a".repeat(257);
        assert_eq!(
            validate_name(&long, "Name", 256),
            Err(NameValidationError::TooLong {
                field: "Name".to_string(),
                max_length: 256
            })
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("a.b@sub.example.org").is_ok());

        assert_eq!(validate_email(""), Err(EmailValidationError::Required));
        assert_eq!(validate_email("no-at-sign"), Err(EmailValidationError::InvalidFormat));
        assert_eq!(validate_email("@example.com"), Err(EmailValidationError::InvalidFormat));
        assert_eq!(validate_email("user@nodot"), Err(EmailValidationError::InvalidFormat));
        assert_eq!(validate_email("user@trailing."), Err(EmailValidationError::InvalidFormat));
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("5551234567").is_ok());
        assert!(validate_mobile("+915551234567").is_ok());

        assert!(validate_mobile("12345").is_err());
        assert!(validate_mobile("555-123-4567").is_err());
        assert!(validate_mobile("1234567890123456").is_err());
    }
}
