// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback form.

use super::{is_valid_email, FieldErrors, INVALID_EMAIL, SUBMIT};
use crate::client::ApiClient;
use crate::models::{Feedback, FeedbackRequest};

pub const MIN_MESSAGE_CHARS: usize = 10;
pub const MAX_MESSAGE_CHARS: usize = 1000;

const GENERIC_FAILURE: &str = "Failed to submit feedback. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct FeedbackForm {
    subject: String,
    message: String,
    allow_contact: bool,
    contact_name: String,
    contact_email: String,
    submitted: bool,
    errors: FieldErrors,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.subject = value.into();
        self.errors.clear("subject");
    }

    /// Input beyond the maximum length is dropped.
    pub fn set_message(&mut self, value: impl Into<String>) {
        let value: String = value.into();
        self.message = value.chars().take(MAX_MESSAGE_CHARS).collect();
        self.errors.clear("message");
    }

    pub fn char_count(&self) -> usize {
        self.message.chars().count()
    }

    pub fn set_allow_contact(&mut self, allow: bool) {
        self.allow_contact = allow;
    }

    pub fn set_contact_name(&mut self, value: impl Into<String>) {
        self.contact_name = value.into();
        self.errors.clear("contactName");
    }

    pub fn set_contact_email(&mut self, value: impl Into<String>) {
        self.contact_email = value.into();
        self.errors.clear("contactEmail");
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear_all();

        if self.subject.trim().is_empty() {
            self.errors.set("subject", "Subject is required");
        }

        if self.message.trim().is_empty() {
            self.errors.set("message", "Message is required");
        } else if self.char_count() < MIN_MESSAGE_CHARS {
            self.errors.set(
                "message",
                "Please provide more details (minimum 10 characters)",
            );
        }

        if self.allow_contact {
            if self.contact_name.trim().is_empty() {
                self.errors
                    .set("contactName", "Name is required for contact");
            }
            if self.contact_email.trim().is_empty() {
                self.errors
                    .set("contactEmail", "Email is required for contact");
            } else if !is_valid_email(&self.contact_email) {
                self.errors.set("contactEmail", INVALID_EMAIL);
            }
        }

        self.errors.is_empty()
    }

    /// Trimmed request body; contact fields are `null` unless contact is
    /// allowed.
    pub fn payload(&self) -> FeedbackRequest {
        let contact = |value: &str| {
            self.allow_contact.then(|| value.trim().to_string())
        };
        FeedbackRequest {
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            contact_name: contact(&self.contact_name),
            contact_email: contact(&self.contact_email),
        }
    }

    /// Validate and send. Failures show the server's message when it sent
    /// one.
    pub async fn submit(&mut self, client: &ApiClient) -> Option<Feedback> {
        if !self.validate() {
            return None;
        }

        match client.submit_feedback(&self.payload()).await {
            Ok(feedback) => {
                self.submitted = true;
                Some(feedback)
            }
            Err(e) => {
                tracing::debug!(error = %e, network = e.is_transport(), "Feedback rejected");
                let message = e
                    .server_message()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                self.errors.set(SUBMIT, message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let mut form = FeedbackForm::new();
        assert!(!form.validate());
        assert_eq!(form.errors().get("subject"), Some("Subject is required"));
        assert_eq!(form.errors().get("message"), Some("Message is required"));

        form.set_subject("App");
        form.set_message("too short");
        assert!(!form.validate());
        assert_eq!(
            form.errors().get("message"),
            Some("Please provide more details (minimum 10 characters)")
        );

        form.set_message("The map takes a long time to load.");
        assert!(form.validate());
    }

    #[test]
    fn test_contact_rules() {
        let mut form = FeedbackForm::new();
        form.set_subject("App");
        form.set_message("The map takes a long time to load.");
        form.set_allow_contact(true);
        assert!(!form.validate());
        assert_eq!(
            form.errors().get("contactName"),
            Some("Name is required for contact")
        );
        assert_eq!(
            form.errors().get("contactEmail"),
            Some("Email is required for contact")
        );

        form.set_contact_name("Pat");
        form.set_contact_email("pat@");
        assert!(!form.validate());
        assert_eq!(form.errors().get("contactEmail"), Some(INVALID_EMAIL));
    }

    #[test]
    fn test_payload() {
        let mut form = FeedbackForm::new();
        form.set_subject("  App ");
        form.set_message("  The map takes a long time to load.  ");
        form.set_contact_name(" Pat ");
        form.set_contact_email("pat@example.com");

        let payload = form.payload();
        assert_eq!(payload.subject, "App");
        assert_eq!(payload.message, "The map takes a long time to load.");
        assert_eq!(payload.contact_name, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["contactEmail"].is_null());

        form.set_allow_contact(true);
        let payload = form.payload();
        assert_eq!(payload.contact_name.as_deref(), Some("Pat"));
        assert_eq!(payload.contact_email.as_deref(), Some("pat@example.com"));
    }

    #[test]
    fn test_message_capped() {
        let mut form = FeedbackForm::new();
        form.set_message("y".repeat(MAX_MESSAGE_CHARS + 1));
        assert_eq!(form.char_count(), MAX_MESSAGE_CHARS);
    }
}
