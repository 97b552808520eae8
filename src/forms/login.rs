// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login form.

use super::{is_valid_email, FieldErrors, INVALID_EMAIL, NETWORK_ERROR, SUBMIT};
use crate::client::ApiClient;
use crate::guard::landing_for_role;
use crate::session::SessionStore;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    errors: FieldErrors,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.errors.clear("email");
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.errors.clear("password");
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear_all();

        if self.email.is_empty() {
            self.errors.set("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            self.errors.set("email", INVALID_EMAIL);
        }

        if self.password.is_empty() {
            self.errors.set("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            self.errors
                .set("password", "Password must be at least 6 characters");
        }

        self.errors.is_empty()
    }

    /// Validate, log in, and start the session.
    ///
    /// Returns the dashboard path to navigate to, or `None` with the reason
    /// under the `submit` error.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        session: &mut SessionStore,
    ) -> Option<&'static str> {
        if !self.validate() {
            return None;
        }

        let user_data = match client.login(&self.email, &self.password).await {
            Ok(data) => data,
            Err(e) => {
                let message = if e.is_transport() {
                    NETWORK_ERROR
                } else if e.status() == Some(401) {
                    "Invalid email or password."
                } else {
                    "Login failed. Please try again later."
                };
                tracing::debug!(error = %e, "Login failed");
                self.errors.set(SUBMIT, message);
                return None;
            }
        };

        let role = match session.login(user_data) {
            Ok(user) => user.role.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not store session");
                self.errors
                    .set(SUBMIT, "Login successful, but received unexpected user data.");
                return None;
            }
        };

        let landing = landing_for_role(&role);
        if landing.is_none() {
            self.errors
                .set(SUBMIT, "Login successful, but received unexpected user data.");
        }
        landing
    }
}
