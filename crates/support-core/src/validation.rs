//! Input validation for entity fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Empty value where one is required.
    Empty(String),
    /// Numeric value outside its allowed range.
    OutOfRange {
        field: String,
        min: u32,
        max: u32,
        actual: u32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, actual),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate an email address (basic format check).
///
/// Checks for exactly one `@`, a non-empty local part, and a domain with
/// at least one interior dot.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "malformed domain".to_string(),
        ));
    }

    Ok(())
}

/// Check that a required free-text field is non-empty after trimming.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(())
}

/// Validate a 1-5 satisfaction or session rating.
pub fn validate_rating(field: &'static str, value: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: 5,
            actual: value as u32,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email(" padded@example.com ").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_email("no-at-sign.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("two@@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@localhost"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@example..com"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("title", "Cannot login").is_ok());
        assert!(matches!(
            validate_required("title", "   "),
            Err(ValidationError::Empty(_))
        ));
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating("satisfaction", 1).is_ok());
        assert!(validate_rating("satisfaction", 5).is_ok());
        assert!(matches!(
            validate_rating("satisfaction", 0),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_rating("satisfaction", 6),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Empty("title".to_string());
        assert_eq!(err.to_string(), "title cannot be empty");

        let err = ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
            actual: 9,
        };
        assert_eq!(err.to_string(), "rating must be between 1 and 5 (got 9)");
    }
}
