// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback routes.
//!
//! Anyone may submit feedback; only administrators can read it back.

use crate::error::Result;
use crate::middleware::auth::{require_auth, AuthUser};
use crate::models::{Feedback, FeedbackRequest};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

/// Feedback routes. The listing is behind the auth middleware while the
/// submission on the same path stays public.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let list = get(list_feedback).route_layer(middleware::from_fn_with_state(state, require_auth));
    Router::new().route("/api/feedback", post(submit_feedback).merge(list))
}

/// Submit feedback.
async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>)> {
    let request = FeedbackRequest {
        subject: request.subject.trim().to_string(),
        message: request.message.trim().to_string(),
        contact_name: trimmed(request.contact_name),
        contact_email: trimmed(request.contact_email),
    };
    request.validate()?;

    let feedback = state.db.insert_feedback(request);
    tracing::info!(feedback_id = feedback.id, "Feedback received");
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// Blank contact fields are stored as absent.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// List all feedback (admin only).
async fn list_feedback(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<Feedback>>> {
    caller.require_admin()?;
    Ok(Json(state.db.list_feedback()))
}
