// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Complaint model: stored record, wire view, and submission draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::{Location, UserSummary};
use crate::time_utils::format_utc_rfc3339;

/// Complaint lifecycle status.
///
/// New complaints start `OPEN`. Only administrators move a complaint
/// between states, and only `RESOLVED` complaints may be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Resolved];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::InProgress => "IN_PROGRESS",
            Status::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// Point reported with a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Complaint record held by the store.
#[derive(Debug, Clone)]
pub struct Complaint {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub severity: Option<u8>,
    pub location_id: u64,
    pub coordinates: Option<Coordinates>,
    pub status: Status,
    pub user_id: u64,
    /// Relative URL under `/uploads`
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Complaint {
    /// Whether `user_id` owns this complaint and it is still editable.
    pub fn is_owned_and_open(&self, user_id: u64) -> bool {
        self.user_id == user_id && self.status == Status::Open
    }
}

/// Location as embedded in a complaint view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintLocation {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub area_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Complaint as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintView {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<u8>,
    pub status: Status,
    #[serde(default)]
    pub image_url: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub location: Option<ComplaintLocation>,
}

impl ComplaintView {
    /// Assemble the wire view from a stored complaint and its relations.
    pub fn assemble(
        complaint: &Complaint,
        user: Option<UserSummary>,
        location: Option<&Location>,
    ) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            category: complaint.category.clone(),
            severity: complaint.severity,
            status: complaint.status,
            image_url: complaint.image_url.clone(),
            timestamp: format_utc_rfc3339(complaint.timestamp),
            user,
            location: location.map(|loc| ComplaintLocation {
                id: loc.id,
                area_name: loc.area_name.clone(),
                city: loc.city.clone(),
                pincode: loc.pincode.clone(),
                coordinates: complaint.coordinates,
            }),
        }
    }

    pub fn owner_id(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.id)
    }
}

/// Contact details attached to a report by the submitter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// The `complaint` part of a create/update multipart request.
///
/// The contact and follow-up fields are sent by the edit form; the server
/// accepts and ignores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDraft {
    #[validate(length(min = 1, max = 200, message = "title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "description is required (max 2000 characters)"
    ))]
    pub description: String,
    #[validate(length(
        min = 1,
        max = 300,
        message = "location address is required (max 300 characters)"
    ))]
    pub location_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5, message = "severity must be between 1 and 5"))]
    pub severity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_follow_up: Option<bool>,
}

/// Query for `PUT /api/complaints/status/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub status: Status,
}
