//! Field-level input rules shared by the services.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DomainError;

pub const BIO_MAX_CHARS: usize = 1000;
pub const WEBSITE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 255;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
        .expect("valid email regex")
});
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Collects per-field messages and turns them into one validation error.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn require_text(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("must be at most {max} characters"));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "Email is required");
        } else if !is_valid_email(value.trim()) {
            self.add(field, "Email should be valid");
        }
    }

    pub fn website(&mut self, field: &str, value: &str) {
        self.max_chars(field, value, WEBSITE_MAX_CHARS);
        if !value.trim().is_empty() && !is_valid_url(value.trim()) {
            self.add(field, "Website must be a valid http(s) URL");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self, message: &str) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation {
                message: message.to_string(),
                field_errors: self.errors,
            })
        }
    }
}

/// Trims optional text, treating a blank value as absent.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane doe@x.com"));
    }

    #[test]
    fn test_url_pattern() {
        assert!(is_valid_url("https://jane.dev/blog"));
        assert!(is_valid_url("http://localhost:8080"));
        assert!(!is_valid_url("ftp://files.example.com"));
        assert!(!is_valid_url("jane.dev"));
    }

    #[test]
    fn test_collects_every_field() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "  ", "Author name is required");
        errors.email("email", "not-an-email");
        errors.max_chars("bio", &"x".repeat(BIO_MAX_CHARS + 1), BIO_MAX_CHARS);

        match errors.finish("Author has invalid fields") {
            Err(DomainError::Validation { field_errors, .. }) => {
                assert_eq!(field_errors.len(), 3);
                assert_eq!(field_errors["email"], "Email should be valid");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("website", "first");
        errors.add("website", "second");
        match errors.finish("bad") {
            Err(DomainError::Validation { field_errors, .. }) => {
                assert_eq!(field_errors["website"], "first")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_trimmed_drops_blank() {
        assert_eq!(trimmed(Some("  hi ".into())), Some("hi".into()));
        assert_eq!(trimmed(Some("   ".into())), None);
        assert_eq!(trimmed(None), None);
    }
}
