// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback inbox for administrators.

use super::ListState;
use crate::client::ApiClient;
use crate::models::Feedback;

#[derive(Debug, Clone)]
pub struct FeedbackList {
    state: ListState<Feedback>,
}

impl Default for FeedbackList {
    fn default() -> Self {
        Self {
            state: ListState::Loading,
        }
    }
}

impl FeedbackList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListState<Feedback> {
        &self.state
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.state = ListState::from_result(client.list_feedback().await, |_| {
            "Failed to fetch feedbacks".to_string()
        });
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        matches!(self.state, ListState::Empty).then_some("No feedback available.")
    }
}
