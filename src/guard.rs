// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client route table and role gate.

use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const USER_DASHBOARD_PATH: &str = "/user/dashboard";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";

/// Outcome of checking a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Session not loaded yet; show a placeholder.
    Loading,
    Redirect(&'static str),
    Render,
}

/// Gate a protected route. An empty `allowed_roles` admits any signed-in
/// user.
pub fn protect(session: &SessionState, allowed_roles: &[&str]) -> Guard {
    match session {
        SessionState::Unknown => Guard::Loading,
        SessionState::Anonymous => Guard::Redirect(LOGIN_PATH),
        SessionState::Authenticated { role } => {
            if allowed_roles.is_empty() || allowed_roles.contains(&role.as_str()) {
                Guard::Render
            } else {
                Guard::Redirect(UNAUTHORIZED_PATH)
            }
        }
    }
}

/// Client views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Landing,
    AboutUs,
    Login,
    Register,
    Feedback,
    /// Issue form; the path segment is carried through untouched.
    ReportIssue(String),
    UserDashboard,
    AdminDashboard,
    Unauthorized,
    NotFound,
}

impl View {
    /// Roles a view requires: `None` for public views, an empty slice for
    /// "any signed-in user".
    pub fn required_roles(&self) -> Option<&'static [&'static str]> {
        match self {
            View::ReportIssue(_) | View::UserDashboard => Some(&[]),
            View::AdminDashboard => Some(&["ADMIN"]),
            _ => None,
        }
    }
}

/// Match a path against the route table.
pub fn resolve(path: &str) -> View {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    match trimmed {
        "/" | "/clean-street-landing-page" => View::Landing,
        "/about-us" => View::AboutUs,
        "/login" => View::Login,
        "/register" => View::Register,
        "/feedback" => View::Feedback,
        "/user/dashboard" => View::UserDashboard,
        "/admin/dashboard" => View::AdminDashboard,
        "/unauthorized" => View::Unauthorized,
        other => match other.strip_prefix("/report-issue/") {
            Some(id) if !id.is_empty() && !id.contains('/') => View::ReportIssue(id.to_string()),
            _ => View::NotFound,
        },
    }
}

/// Where a navigation to `path` ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Loading,
    Show(View),
    Redirect(&'static str),
}

/// Resolve `path` and apply the role gate.
pub fn navigate(session: &SessionState, path: &str) -> Navigation {
    let view = resolve(path);
    let Some(roles) = view.required_roles() else {
        return Navigation::Show(view);
    };

    match protect(session, roles) {
        Guard::Loading => Navigation::Loading,
        Guard::Redirect(to) => Navigation::Redirect(to),
        Guard::Render => Navigation::Show(view),
    }
}

/// Landing page after login, or `None` for a role the client does not know.
pub fn landing_for_role(role: &str) -> Option<&'static str> {
    match role {
        "ADMIN" => Some(ADMIN_DASHBOARD_PATH),
        "USER" => Some(USER_DASHBOARD_PATH),
        _ => None,
    }
}
