// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report / edit issue form: fill in, preview, submit.

use super::{is_valid_email, FieldErrors, INVALID_EMAIL, NETWORK_ERROR, SUBMIT};
use crate::client::{ApiClient, Attachment};
use crate::config::MAX_IMAGE_BYTES;
use crate::models::{ComplaintDraft, ComplaintView, ContactInfo};
use crate::session::SessionUser;

/// Issue categories as `(id, display name)`.
pub const CATEGORIES: [(&str, &str); 10] = [
    ("graffiti", "Graffiti"),
    ("trash", "Trash & Litter"),
    ("infrastructure", "Infrastructure"),
    ("lighting", "Street Lighting"),
    ("vegetation", "Vegetation"),
    ("traffic", "Traffic & Parking"),
    ("public-safety", "Public Safety"),
    ("noise", "Noise Issues"),
    ("water", "Water & Drainage"),
    ("other", "Other"),
];

pub const DEFAULT_SEVERITY: u8 = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_MEDIA_FILES: usize = 5;
pub const ALLOWED_MEDIA_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/mov",
    "video/avi",
];

/// A file picked for upload.
pub type MediaFile = Attachment;

/// Display name for a category id; unknown ids are shown as-is.
pub fn category_name(id: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == id)
        .map_or(id, |(_, name)| *name)
}

/// Priority label for a severity level. Out-of-range levels read as medium.
pub fn severity_label(level: u8) -> &'static str {
    match level {
        1 => "Low",
        2 => "Low-Medium",
        4 => "Medium-High",
        5 => "High",
        _ => "Medium",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit { id: u64 },
}

#[derive(Debug, Clone)]
pub struct IssueForm {
    mode: Mode,
    category: String,
    title: String,
    description: String,
    location_address: String,
    severity: u8,
    media: Vec<MediaFile>,
    contact: ContactInfo,
    is_anonymous: bool,
    allow_follow_up: bool,
    show_summary: bool,
    errors: FieldErrors,
}

fn contact_from(user: Option<&SessionUser>) -> ContactInfo {
    ContactInfo {
        name: user.map(|u| u.name.clone()).unwrap_or_default(),
        email: user.map(|u| u.email.clone()).unwrap_or_default(),
        phone: String::new(),
    }
}

impl IssueForm {
    fn blank(mode: Mode, contact: ContactInfo) -> Self {
        Self {
            mode,
            category: String::new(),
            title: String::new(),
            description: String::new(),
            location_address: String::new(),
            severity: DEFAULT_SEVERITY,
            media: Vec::new(),
            contact,
            is_anonymous: false,
            allow_follow_up: true,
            show_summary: false,
            errors: FieldErrors::default(),
        }
    }

    /// New report, contact details taken from the signed-in user.
    pub fn new_report(user: Option<&SessionUser>) -> Self {
        Self::blank(Mode::Create, contact_from(user))
    }

    /// Edit an existing complaint. Contact details come from its owner.
    pub fn edit(complaint: &ComplaintView) -> Self {
        let contact = ContactInfo {
            name: complaint
                .user
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            email: complaint
                .user
                .as_ref()
                .map(|u| u.email.clone())
                .unwrap_or_default(),
            phone: String::new(),
        };
        let mut form = Self::blank(Mode::Edit { id: complaint.id }, contact);
        form.category = complaint.category.clone().unwrap_or_default();
        form.title = complaint.title.clone();
        form.set_description(complaint.description.clone());
        form.location_address = complaint
            .location
            .as_ref()
            .map(|l| l.area_name.clone())
            .unwrap_or_default();
        form.severity = complaint.severity.unwrap_or(DEFAULT_SEVERITY);
        form
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_category(&mut self, id: impl Into<String>) {
        self.category = id.into();
        self.errors.clear("category");
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
        self.errors.clear("title");
    }

    /// Input beyond the maximum length is dropped.
    pub fn set_description(&mut self, value: impl Into<String>) {
        let value: String = value.into();
        self.description = value.chars().take(MAX_DESCRIPTION_CHARS).collect();
        self.errors.clear("description");
    }

    pub fn set_location_address(&mut self, value: impl Into<String>) {
        self.location_address = value.into();
        self.errors.clear("locationAddress");
    }

    pub fn set_severity(&mut self, level: u8) {
        self.severity = level.clamp(1, 5);
    }

    pub fn set_contact_name(&mut self, value: impl Into<String>) {
        self.contact.name = value.into();
        self.errors.clear("contactName");
    }

    pub fn set_contact_email(&mut self, value: impl Into<String>) {
        self.contact.email = value.into();
        self.errors.clear("contactEmail");
    }

    pub fn set_contact_phone(&mut self, value: impl Into<String>) {
        self.contact.phone = value.into();
    }

    pub fn set_anonymous(&mut self, anonymous: bool) {
        self.is_anonymous = anonymous;
    }

    pub fn set_allow_follow_up(&mut self, allow: bool) {
        self.allow_follow_up = allow;
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }

    pub fn char_count(&self) -> usize {
        self.description.chars().count()
    }

    pub fn media(&self) -> &[MediaFile] {
        &self.media
    }

    /// Add picked files. Files past the five-file limit are ignored; files
    /// of the wrong type or over 10 MiB are skipped. Returns one message per
    /// skipped file.
    pub fn add_media(&mut self, files: Vec<MediaFile>) -> Vec<String> {
        let room = MAX_MEDIA_FILES.saturating_sub(self.media.len());
        let mut rejected = Vec::new();

        for file in files.into_iter().take(room) {
            if !ALLOWED_MEDIA_TYPES.contains(&file.mime.as_str()) {
                rejected.push(format!("File type {} is not supported", file.mime));
            } else if file.bytes.len() > MAX_IMAGE_BYTES {
                rejected.push(format!(
                    "File {} is too large. Maximum size is 10MB",
                    file.file_name
                ));
            } else {
                self.media.push(file);
            }
        }
        rejected
    }

    pub fn remove_media(&mut self, index: usize) {
        if index < self.media.len() {
            self.media.remove(index);
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear_all();

        if self.category.is_empty() {
            self.errors.set("category", "Please select an issue category");
        }
        if self.title.trim().is_empty() {
            self.errors.set("title", "Issue title is required");
        }
        if self.description.trim().is_empty() {
            self.errors
                .set("description", "Issue description is required");
        } else if self.char_count() < MIN_DESCRIPTION_CHARS {
            self.errors.set(
                "description",
                "Please provide more details (minimum 20 characters)",
            );
        }
        if self.location_address.trim().is_empty() {
            self.errors
                .set("locationAddress", "Location address is required");
        }

        if !self.is_anonymous {
            if self.contact.name.trim().is_empty() {
                self.errors
                    .set("contactName", "Name is required for non-anonymous reports");
            }
            if self.contact.email.trim().is_empty() {
                self.errors
                    .set("contactEmail", "Email is required for non-anonymous reports");
            } else if !is_valid_email(&self.contact.email) {
                self.errors.set("contactEmail", INVALID_EMAIL);
            }
        }

        self.errors.is_empty()
    }

    /// Switch to the summary if the form validates.
    pub fn preview(&mut self) -> bool {
        self.show_summary = self.validate();
        self.show_summary
    }

    pub fn is_previewing(&self) -> bool {
        self.show_summary
    }

    pub fn back_to_form(&mut self) {
        self.show_summary = false;
    }

    /// Lines shown on the review screen.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Category", category_name(&self.category).to_string()),
            ("Title", self.title.trim().to_string()),
            ("Description", self.description.clone()),
            ("Location", self.location_address.clone()),
            (
                "Priority",
                format!("{} Priority", severity_label(self.severity)),
            ),
            ("Attachments", self.media.len().to_string()),
        ];
        if self.is_anonymous {
            lines.push(("Reporter", "Anonymous".to_string()));
        } else {
            lines.push((
                "Reporter",
                format!("{} <{}>", self.contact.name, self.contact.email),
            ));
        }
        lines
    }

    /// The `complaint` part of the request. Edits also carry the contact
    /// and follow-up settings.
    pub fn payload(&self) -> ComplaintDraft {
        let mut draft = ComplaintDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            location_address: self.location_address.clone(),
            category: Some(self.category.clone()).filter(|c| !c.is_empty()),
            severity: Some(self.severity),
            ..ComplaintDraft::default()
        };
        if let Mode::Edit { .. } = self.mode {
            draft.contact_info = Some(self.contact.clone());
            draft.is_anonymous = Some(self.is_anonymous);
            draft.allow_follow_up = Some(self.allow_follow_up);
        }
        draft
    }

    /// Only the first picked file is uploaded.
    pub fn image(&self) -> Option<Attachment> {
        self.media.first().cloned()
    }

    /// Clear everything except the mode; contact details are re-filled from
    /// `user`.
    pub fn reset(&mut self, user: Option<&SessionUser>) {
        *self = Self::blank(self.mode, contact_from(user));
    }

    /// Send the report. On success the form is reset and the stored
    /// complaint returned; on failure the reason is under `submit`.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        user: Option<&SessionUser>,
    ) -> Option<ComplaintView> {
        if !self.validate() {
            self.show_summary = false;
            return None;
        }

        let draft = self.payload();
        let image = self.image();
        let (result, verb) = match self.mode {
            Mode::Create => (client.create_complaint(&draft, image).await, "submit"),
            Mode::Edit { id } => (client.update_complaint(id, &draft, image).await, "update"),
        };

        match result {
            Ok(complaint) => {
                tracing::info!(
                    complaint_id = complaint.id,
                    status = %complaint.status,
                    action = verb,
                    "Report sent"
                );
                self.reset(user);
                Some(complaint)
            }
            Err(e) => {
                let message = if e.is_transport() {
                    NETWORK_ERROR.to_string()
                } else {
                    format!("Failed to {} report: {}", verb, e)
                };
                self.errors.set(SUBMIT, message);
                None
            }
        }
    }
}
