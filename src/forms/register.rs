// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Three-step registration wizard.
//!
//! Step 1 is the account (name, email, password), step 2 the address, and
//! step 3 the terms. Only the account fields are sent to the server.

use super::{is_valid_email, is_valid_name, FieldErrors, INVALID_EMAIL, NETWORK_ERROR, SUBMIT};
use crate::client::ApiClient;
use crate::guard::LOGIN_PATH;
use crate::models::RegisterRequest;

pub const TOTAL_STEPS: u8 = 3;
const MIN_PASSWORD_LEN: usize = 8;

/// Text fields of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Address,
    City,
    ZipCode,
    Neighborhood,
}

impl Field {
    /// Error key for the field.
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::Address => "address",
            Field::City => "city",
            Field::ZipCode => "zipCode",
            Field::Neighborhood => "neighborhood",
        }
    }
}

/// Password strength score (0-5) with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: &'static str,
}

impl PasswordStrength {
    /// One point each for length, lowercase, uppercase, digit and symbol.
    pub fn of(password: &str) -> Self {
        let checks = [
            password.chars().count() >= MIN_PASSWORD_LEN,
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace())),
        ];
        let score = checks.iter().filter(|passed| **passed).count() as u8;
        let label = match score {
            0 | 1 => "Very Weak",
            2 => "Weak",
            3 => "Fair",
            4 => "Strong",
            _ => "Very Strong",
        };
        Self { score, label }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    step: u8,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    confirm_password: String,
    address: String,
    city: String,
    zip_code: String,
    neighborhood: String,
    agree_to_terms: bool,
    errors: FieldErrors,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            step: 1,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            address: String::new(),
            city: String::new(),
            zip_code: String::new(),
            neighborhood: String::new(),
            agree_to_terms: false,
            errors: FieldErrors::default(),
        }
    }
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::ZipCode => &self.zip_code,
            Field::Neighborhood => &self.neighborhood,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::ZipCode => &mut self.zip_code,
            Field::Neighborhood => &mut self.neighborhood,
        };
        *slot = value;
        self.errors.clear(field.key());
    }

    pub fn set_agree_to_terms(&mut self, agreed: bool) {
        self.agree_to_terms = agreed;
        self.errors.clear("agreeToTerms");
    }

    pub fn password_strength(&self) -> PasswordStrength {
        PasswordStrength::of(&self.password)
    }

    /// Check one step, replacing the error map.
    pub fn validate_step(&mut self, step: u8) -> bool {
        self.errors.clear_all();

        match step {
            1 => {
                self.check_name(Field::FirstName, "First name");
                self.check_name(Field::LastName, "Last name");

                if self.email.is_empty() {
                    self.errors.set("email", "Email is required");
                } else if !is_valid_email(&self.email) {
                    self.errors.set("email", INVALID_EMAIL);
                }

                if self.password.is_empty() {
                    self.errors.set("password", "Password is required");
                } else if self.password.chars().count() < MIN_PASSWORD_LEN {
                    self.errors
                        .set("password", "Password must be at least 8 characters");
                }

                if self.confirm_password.is_empty() {
                    self.errors
                        .set("confirmPassword", "Please confirm your password");
                } else if self.password != self.confirm_password {
                    self.errors.set("confirmPassword", "Passwords do not match");
                }
            }
            2 => {
                let required = [
                    (Field::Address, "Address is required"),
                    (Field::City, "City is required"),
                    (Field::ZipCode, "ZIP code is required"),
                    (Field::Neighborhood, "Neighborhood is required"),
                ];
                for (field, message) in required {
                    if self.get(field).is_empty() {
                        self.errors.set(field.key(), message);
                    }
                }
            }
            3 => {
                if !self.agree_to_terms {
                    self.errors
                        .set("agreeToTerms", "You must agree to the terms and conditions");
                }
            }
            _ => {}
        }

        self.errors.is_empty()
    }

    fn check_name(&mut self, field: Field, label: &str) {
        let value = self.get(field);
        if value.is_empty() {
            self.errors
                .set(field.key(), format!("{} is required", label));
        } else if !is_valid_name(value) {
            self.errors.set(
                field.key(),
                format!("Please enter a valid {}", label.to_lowercase()),
            );
        }
    }

    /// Advance if the current step validates.
    pub fn next(&mut self) -> bool {
        if self.step < TOTAL_STEPS && self.validate_step(self.step) {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        if self.step > 1 {
            self.step -= 1;
        }
    }

    pub fn payload(&self) -> RegisterRequest {
        RegisterRequest {
            name: format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Validate the final step and register.
    ///
    /// Returns the login path on success; otherwise the reason is under the
    /// `submit` error.
    pub async fn submit(&mut self, client: &ApiClient) -> Option<&'static str> {
        if !self.validate_step(TOTAL_STEPS) {
            return None;
        }

        match client.register(&self.payload()).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Registered");
                Some(LOGIN_PATH)
            }
            Err(e) => {
                let message = if e.is_transport() {
                    NETWORK_ERROR.to_string()
                } else if matches!(e.status(), Some(400) | Some(409)) {
                    e.server_message()
                        .unwrap_or_else(|| "Registration failed due to invalid data.".to_string())
                } else {
                    "Registration failed. Please try again later.".to_string()
                };
                tracing::debug!(error = %e, "Registration failed");
                self.errors.set(SUBMIT, message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_step_one() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.set(Field::FirstName, "Asha");
        form.set(Field::LastName, "Rao");
        form.set(Field::Email, "asha@example.com");
        form.set(Field::Password, "Secret#123");
        form.set(Field::ConfirmPassword, "Secret#123");
        form
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(PasswordStrength::of("").label, "Very Weak");
        assert_eq!(PasswordStrength::of("abc").score, 1);
        assert_eq!(PasswordStrength::of("abcdefgh").label, "Weak");
        assert_eq!(PasswordStrength::of("Abcdefgh").label, "Fair");
        assert_eq!(PasswordStrength::of("Abcdefg1").label, "Strong");
        assert_eq!(
            PasswordStrength::of("Abcdef1!"),
            PasswordStrength {
                score: 5,
                label: "Very Strong"
            }
        );
        // Underscore and spaces are not symbols.
        assert_eq!(PasswordStrength::of("a_ b").score, 1);
    }

    #[test]
    fn test_step_one_errors() {
        let mut form = RegisterForm::new();
        assert!(!form.next());
        assert_eq!(form.step(), 1);
        assert_eq!(form.errors().get("firstName"), Some("First name is required"));
        assert_eq!(form.errors().get("lastName"), Some("Last name is required"));
        assert_eq!(form.errors().get("email"), Some("Email is required"));
        assert_eq!(form.errors().get("password"), Some("Password is required"));
        assert_eq!(
            form.errors().get("confirmPassword"),
            Some("Please confirm your password")
        );

        form.set(Field::FirstName, "R2D2");
        form.set(Field::Password, "short");
        form.set(Field::ConfirmPassword, "shorter");
        form.validate_step(1);
        assert_eq!(
            form.errors().get("firstName"),
            Some("Please enter a valid first name")
        );
        assert_eq!(
            form.errors().get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            form.errors().get("confirmPassword"),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_wizard_gating() {
        let mut form = filled_step_one();
        assert!(form.next());
        assert_eq!(form.step(), 2);

        assert!(!form.next());
        assert_eq!(form.errors().get("zipCode"), Some("ZIP code is required"));
        assert_eq!(form.errors().len(), 4);

        form.set(Field::ZipCode, "560001");
        assert_eq!(form.errors().get("zipCode"), None);
        form.set(Field::Address, "12 MG Road");
        form.set(Field::City, "Bengaluru");
        form.set(Field::Neighborhood, "Indiranagar");
        assert!(form.next());
        assert_eq!(form.step(), 3);

        // Last step: there is no step 4 to advance to.
        form.set_agree_to_terms(true);
        assert!(!form.next());
        assert!(form.validate_step(3));

        form.back();
        form.back();
        form.back();
        assert_eq!(form.step(), 1);
    }

    #[test]
    fn test_terms_required() {
        let mut form = RegisterForm::new();
        assert!(!form.validate_step(3));
        assert_eq!(
            form.errors().get("agreeToTerms"),
            Some("You must agree to the terms and conditions")
        );
    }

    #[test]
    fn test_payload() {
        let payload = filled_step_one().payload();
        assert_eq!(payload.name, "Asha Rao");
        assert_eq!(payload.email, "asha@example.com");
        assert_eq!(payload.password, "Secret#123");
    }
}
