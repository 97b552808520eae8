// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of complaints and feedback.
//!
//! Presentation only: what to show and which actions to offer. The server
//! still decides whether an action succeeds.

use crate::forms::issue::{category_name, severity_label};
use crate::models::{ComplaintView, Feedback, Status};
use crate::time_utils::display_date;
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";

pub fn status_badge(status: Status) -> String {
    format!("[{}]", status)
}

/// Absolute URL for a stored image path such as `/uploads/x.png`.
pub fn image_url(origin: &str, relative: Option<&str>) -> Option<String> {
    relative
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", origin.trim_end_matches('/'), path))
}

/// Actions a card offers to the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardActions {
    pub change_status: bool,
    pub edit: bool,
    pub delete: bool,
}

/// Admins triage any complaint and may delete resolved ones. Owners may
/// edit while it is `OPEN` and delete once it is `RESOLVED`.
pub fn card_actions(complaint: &ComplaintView, viewer_id: Option<u64>, is_admin: bool) -> CardActions {
    if is_admin {
        return CardActions {
            change_status: true,
            edit: false,
            delete: complaint.status == Status::Resolved,
        };
    }

    let is_owner = viewer_id.is_some() && complaint.owner_id() == viewer_id;
    CardActions {
        change_status: false,
        edit: is_owner && complaint.status == Status::Open,
        delete: is_owner && complaint.status == Status::Resolved,
    }
}

/// Multi-line card for one complaint.
pub fn complaint_card(
    complaint: &ComplaintView,
    origin: &str,
    viewer_id: Option<u64>,
    is_admin: bool,
) -> String {
    let location = complaint
        .location
        .as_ref()
        .map(|l| l.area_name.as_str())
        .filter(|a| !a.is_empty())
        .unwrap_or(NOT_AVAILABLE);
    let reporter = complaint
        .user
        .as_ref()
        .map(|u| if u.name.is_empty() { u.email.as_str() } else { u.name.as_str() })
        .filter(|r| !r.is_empty())
        .unwrap_or(NOT_AVAILABLE);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {} {}",
        complaint.id,
        complaint.title,
        status_badge(complaint.status)
    );
    let _ = writeln!(out, "  {}", complaint.description);
    if let Some(category) = complaint.category.as_deref() {
        let _ = writeln!(out, "  Category: {}", category_name(category));
    }
    if let Some(level) = complaint.severity {
        let _ = writeln!(out, "  Priority: {}", severity_label(level));
    }
    let _ = writeln!(out, "  Location: {}", location);
    let _ = writeln!(out, "  Reported by: {}", reporter);
    let _ = writeln!(out, "  Reported on: {}", display_date(&complaint.timestamp));
    if let Some(url) = image_url(origin, complaint.image_url.as_deref()) {
        let _ = writeln!(out, "  Image: {}", url);
    }

    let actions = card_actions(complaint, viewer_id, is_admin);
    let mut offered = Vec::new();
    if actions.change_status {
        offered.push("status");
    }
    if actions.edit {
        offered.push("edit");
    }
    if actions.delete {
        offered.push("delete");
    }
    if !offered.is_empty() {
        let _ = writeln!(out, "  Actions: {}", offered.join(", "));
    }
    out
}

/// Feedback as a table; missing values show as `-`.
pub fn feedback_table(items: &[Feedback]) -> String {
    let dash = |v: Option<&str>| v.filter(|s| !s.is_empty()).unwrap_or("-").to_string();

    let mut out = String::from("ID\tSubject\tMessage\tContact Name\tContact Email\n");
    for fb in items {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            fb.id,
            dash(Some(fb.subject.as_str())),
            dash(Some(fb.message.as_str())),
            dash(fb.contact_name.as_deref()),
            dash(fb.contact_email.as_deref()),
        );
    }
    out
}
