// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Complaint lists for the admin and user dashboards.

use super::{failure_alert, http_error, ListState, Prompt};
use crate::client::ApiClient;
use crate::forms::IssueForm;
use crate::models::{ComplaintView, Status};

/// Every complaint in the system, with triage actions.
#[derive(Debug, Clone)]
pub struct AdminComplaintList {
    state: ListState<ComplaintView>,
    search: String,
}

impl Default for AdminComplaintList {
    fn default() -> Self {
        Self {
            state: ListState::Loading,
            search: String::new(),
        }
    }
}

impl AdminComplaintList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListState<ComplaintView> {
        &self.state
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.state = ListState::from_result(client.list_complaints().await, http_error);
    }

    /// Filter shown complaints by area name (case-insensitive substring).
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn visible(&self) -> Vec<&ComplaintView> {
        let needle = self.search.to_lowercase();
        self.state
            .items()
            .iter()
            .filter(|c| {
                c.location
                    .as_ref()
                    .is_some_and(|l| l.area_name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Message for a list with nothing to show, if that is the case.
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.state {
            ListState::Empty => Some("No complaints found in the system."),
            ListState::Loaded(_) if self.visible().is_empty() => {
                Some("No complaints found matching your search.")
            }
            _ => None,
        }
    }

    /// Set a complaint's status, then refetch the whole list.
    pub async fn change_status(
        &mut self,
        client: &ApiClient,
        prompt: &mut dyn Prompt,
        id: u64,
        status: Status,
    ) -> bool {
        match client.update_status(id, status).await {
            Ok(reply) => {
                tracing::debug!(complaint_id = id, reply = %reply, "Status updated");
                self.load(client).await;
                prompt.alert(&format!("Complaint {} status updated to {}", id, status));
                true
            }
            Err(e) => {
                prompt.alert(&failure_alert("update status", &e));
                false
            }
        }
    }

    /// Confirm, re-check the complaint is `RESOLVED`, then delete it.
    pub async fn delete(&mut self, client: &ApiClient, prompt: &mut dyn Prompt, id: u64) -> bool {
        if !prompt.confirm(&format!("Are you sure you want to delete complaint {}?", id)) {
            return false;
        }

        let current = match client.get_complaint(id).await {
            Ok(c) => c,
            Err(e) => {
                prompt.alert(&failure_alert("fetch complaint for deletion check", &e));
                return false;
            }
        };
        if current.status != Status::Resolved {
            prompt.alert("Complaints can only be deleted if their status is RESOLVED.");
            return false;
        }

        match client.delete_complaint(id).await {
            Ok(()) => {
                prompt.alert("Complaint deleted successfully by Admin!");
                self.state.retain(|c| c.id != id);
                true
            }
            Err(e) => {
                prompt.alert(&failure_alert("delete complaint", &e));
                false
            }
        }
    }
}

/// The signed-in user's own complaints.
#[derive(Debug, Clone)]
pub struct UserComplaintList {
    user_id: u64,
    state: ListState<ComplaintView>,
}

impl UserComplaintList {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState<ComplaintView> {
        &self.state
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.state =
            ListState::from_result(client.user_complaints(self.user_id).await, http_error);
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        matches!(self.state, ListState::Empty).then_some("You have not reported any complaints yet.")
    }

    /// Open a complaint from the list in the issue form.
    pub fn edit(&self, id: u64) -> Option<IssueForm> {
        self.state
            .items()
            .iter()
            .find(|c| c.id == id)
            .map(IssueForm::edit)
    }

    /// Confirm and delete; the entry is dropped locally on success.
    pub async fn delete(&mut self, client: &ApiClient, prompt: &mut dyn Prompt, id: u64) -> bool {
        if !prompt.confirm(&format!("Are you sure you want to delete complaint {}?", id)) {
            return false;
        }

        match client.delete_complaint(id).await {
            Ok(()) => {
                prompt.alert("Complaint deleted successfully!");
                self.state.retain(|c| c.id != id);
                true
            }
            Err(e) => {
                prompt.alert(&failure_alert("delete complaint", &e));
                false
            }
        }
    }
}
