// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! List views over fetched JSON.
//!
//! A view fetches its whole collection on load and keeps that snapshot
//! until it is reloaded. Mutations that fail are reported through the
//! [`Prompt`] and leave the snapshot alone.

pub mod complaints;
pub mod feedback;
pub mod render;

pub use complaints::{AdminComplaintList, UserComplaintList};
pub use feedback::FeedbackList;

use crate::client::ClientError;

/// Confirmation and alert dialogs.
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Lifecycle of a fetched list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Error(String),
    Empty,
    Loaded(Vec<T>),
}

impl<T> ListState<T> {
    fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            ListState::Empty
        } else {
            ListState::Loaded(items)
        }
    }

    /// Fetch outcome, with errors described by `describe`.
    fn from_result(
        result: Result<Vec<T>, ClientError>,
        describe: impl FnOnce(&ClientError) -> String,
    ) -> Self {
        match result {
            Ok(items) => Self::from_items(items),
            Err(e) => {
                tracing::warn!(error = %e, "List fetch failed");
                ListState::Error(describe(&e))
            }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    /// Drop entries locally. Only a loaded list changes.
    fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        if let ListState::Loaded(items) = self {
            let mut items = std::mem::take(items);
            items.retain(keep);
            *self = Self::from_items(items);
        }
    }
}

/// Load failure text: the HTTP status when the server answered, otherwise
/// the transport error.
fn http_error(err: &ClientError) -> String {
    match err.status() {
        Some(status) => format!("HTTP error! status: {}", status),
        None => err.to_string(),
    }
}

/// Alert text for a failed mutation.
fn failure_alert(action: &str, err: &ClientError) -> String {
    match err {
        ClientError::Http(_) => format!(
            "Network error: Could not connect to the server. {}",
            err
        ),
        _ => format!("Failed to {}: {}", action, err),
    }
}
