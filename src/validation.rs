//! Input validation helpers.
//!
//! Accounts are only eligible for warnings when their login identifier is a
//! deliverable-looking e-mail address.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    // local@domain.tld with dot-separated labels; no leading/trailing dots
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .expect("email regex is valid");
}

/// Maximum total length of an address (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of the local part.
const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Validation error type.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an e-mail address.
///
/// # Example
/// ```
/// use expiry_warden::validation::validate_email;
///
/// assert!(validate_email("alice@example.com", "username").is_ok());
/// assert!(validate_email("alice", "username").is_err());
/// ```
pub fn validate_email(value: &str, field_name: &str) -> ValidationResult<()> {
    let invalid = |message: &str| ValidationError {
        field: field_name.to_string(),
        message: message.to_string(),
    };

    if value.len() > MAX_EMAIL_LENGTH {
        return Err(invalid("e-mail address is too long"));
    }

    let local_len = value.find('@').unwrap_or(value.len());
    if local_len > MAX_LOCAL_PART_LENGTH {
        return Err(invalid("e-mail local part is too long"));
    }

    if EMAIL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(invalid("invalid e-mail format (expected: local@domain.tld)"))
    }
}

/// Convenience predicate over [`validate_email`].
pub fn is_valid_email(value: &str) -> bool {
    validate_email(value, "email").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(is_valid_email("a_b-c@sub-domain.example.org"));
    }

    #[test]
    fn rejects_non_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainusername"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(".user@example.com"));
        assert!(!is_valid_email("user.@example.com"));
        assert!(!is_valid_email("user@-example.com"));
    }

    #[test]
    fn rejects_overlong_local_part() {
        let local = "a".repeat(65);
        let err = validate_email(&format!("{local}@example.com"), "username").unwrap_err();
        assert_eq!(err.field, "username");
    }

    #[test]
    fn error_names_the_field() {
        let err = validate_email("nope", "username").unwrap_err();
        assert!(err.to_string().starts_with("username:"));
    }
}
