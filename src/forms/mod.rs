// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side forms.
//!
//! Each form owns its field values and a map of field-keyed errors.
//! Setting a field clears that field's error; validation refills the map.
//! Submission failures land under the [`SUBMIT`] key.

pub mod feedback;
pub mod issue;
pub mod login;
pub mod register;

pub use feedback::FeedbackForm;
pub use issue::{IssueForm, MediaFile};
pub use login::LoginForm;
pub use register::{PasswordStrength, RegisterForm};

use std::collections::BTreeMap;

/// Error key for failures not tied to one field.
pub const SUBMIT: &str = "submit";

pub const NETWORK_ERROR: &str = "Network error. Could not connect to the server.";
pub(crate) const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Validation and submission errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Loose email check: something, `@`, something, `.`, something, with no
/// whitespace inside the address.
pub fn is_valid_email(value: &str) -> bool {
    value.char_indices().any(|(at, c)| {
        if c != '@' {
            return false;
        }
        let before_ok = value[..at]
            .chars()
            .next_back()
            .is_some_and(|prev| !prev.is_whitespace());
        let domain: Vec<char> = value[at + 1..]
            .chars()
            .take_while(|ch| !ch.is_whitespace())
            .collect();
        let dot_ok = domain
            .iter()
            .enumerate()
            .any(|(i, ch)| *ch == '.' && i > 0 && i + 1 < domain.len());
        before_ok && dot_ok
    })
}

/// Person name: up to three runs of ASCII letters, each optionally followed
/// by one space, hyphen or apostrophe.
pub fn is_valid_name(value: &str) -> bool {
    let mut runs = 0;
    let mut in_run = false;
    for c in value.chars() {
        if c.is_ascii_alphabetic() {
            if !in_run {
                runs += 1;
                in_run = true;
            }
        } else if matches!(c, ' ' | '-' | '\'') && in_run {
            in_run = false;
        } else {
            return false;
        }
    }
    (1..=3).contains(&runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("see me at x@y.z today"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("user@exa mple.com"));
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("Asha"));
        assert!(is_valid_name("Mary Jane"));
        assert!(is_valid_name("O'Neil"));
        assert!(is_valid_name("Jean-Luc Picard"));
        assert!(is_valid_name("Ann-"));

        assert!(!is_valid_name(""));
        assert!(!is_valid_name(" Ann"));
        assert!(!is_valid_name("Ann  Lee"));
        assert!(!is_valid_name("Ann--Lee"));
        assert!(!is_valid_name("A B C D"));
        assert!(!is_valid_name("R2D2"));
        assert!(!is_valid_name("José"));
    }

    #[test]
    fn test_field_errors() {
        let mut errors = FieldErrors::default();
        errors.set("email", "Email is required");
        errors.set(SUBMIT, "Nope");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Email is required"));

        errors.clear("email");
        assert_eq!(errors.get("email"), None);
        assert_eq!(errors.iter().collect::<Vec<_>>(), vec![(SUBMIT, "Nope")]);

        errors.clear_all();
        assert!(errors.is_empty());
    }
}
