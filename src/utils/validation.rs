//! Validation Utilities
//!
//! Input validation and normalization helpers for user data.

use regex::Regex;
use std::sync::OnceLock;

/// Validates email address format
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Normalizes email address to lowercase and removes surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates that a name contains only allowed characters and length
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();

    if trimmed.is_empty() || trimmed.len() > 100 {
        return false;
    }

    // Letters, spaces, hyphens, and apostrophes
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("Failed to compile name regex"));

    regex.is_match(trimmed)
}

/// Derives the DiceBear initials avatar URL assigned to new accounts
pub fn initials_avatar_url(first_name: &str, last_name: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/initials/svg?seed={}{}",
        first_name.trim(),
        last_name.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@domain.co.uk"));
        assert!(validate_email("a@x.com"));
        assert!(!validate_email("invalid.email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("Test@Domain.org"), "test@domain.org");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe"));
        assert!(validate_name("Mary-Jane O'Brien"));
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
        assert!(!validate_name(&"a".repeat(101)));
        assert!(!validate_name("Robert'); DROP TABLE users;--"));
    }

    #[test]
    fn test_initials_avatar_url() {
        let url = initials_avatar_url("John", "Doe");
        assert_eq!(
            url,
            "https://api.dicebear.com/7.x/initials/svg?seed=JohnDoe"
        );
    }
}
