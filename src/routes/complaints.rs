// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Complaint routes: filing, listing, editing, triage, and deletion.
//!
//! Create and update take `multipart/form-data` with a JSON `complaint`
//! part and an optional `image` file part.

use crate::db::NewComplaint;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::complaint::StatusQuery;
use crate::models::{Complaint, ComplaintDraft, ComplaintView};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

/// Complaint routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/complaints", get(list_all).post(create))
        .route("/api/complaints/user/{user_id}", get(list_for_user))
        .route("/api/complaints/status/{id}", put(update_status))
        .route(
            "/api/complaints/{id}",
            get(get_one).put(update).delete(delete_one),
        )
}

// ─── Multipart Parsing ───────────────────────────────────────

/// Image part of a complaint request.
struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Parsed multipart complaint request.
struct ComplaintForm {
    draft: ComplaintDraft,
    image: Option<ImageUpload>,
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {}", err))
}

/// Read the `complaint` JSON part and the optional `image` part.
///
/// Unknown parts are skipped; an empty image part counts as no image.
async fn read_complaint_form(mut multipart: Multipart) -> Result<ComplaintForm> {
    let mut draft = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "complaint" => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                let parsed: ComplaintDraft = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::BadRequest(format!("Invalid complaint JSON: {}", e))
                })?;
                draft = Some(parsed);
            }
            "image" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => {
                tracing::debug!(part = other, "Ignoring unexpected multipart part");
            }
        }
    }

    let draft = draft.ok_or_else(|| {
        AppError::BadRequest("Missing 'complaint' part in multipart body".to_string())
    })?;
    draft.validate()?;

    Ok(ComplaintForm { draft, image })
}

async fn store_image(state: &AppState, image: Option<ImageUpload>) -> Result<Option<String>> {
    match image {
        Some(upload) => state
            .storage
            .store(&upload.file_name, &upload.bytes)
            .await
            .map(Some)
            .map_err(|e| match e {
                crate::services::StorageError::InvalidName(name) => {
                    AppError::BadRequest(format!("Invalid image file name: {}", name))
                }
                other => AppError::Storage(other.to_string()),
            }),
        None => Ok(None),
    }
}

// ─── View Assembly ───────────────────────────────────────────

fn to_view(state: &AppState, complaint: &Complaint) -> ComplaintView {
    let user = state.db.get_user(complaint.user_id).map(|u| u.summary());
    let location = state.db.get_location(complaint.location_id);
    ComplaintView::assemble(complaint, user, location.as_ref())
}

fn to_views(state: &AppState, complaints: &[Complaint]) -> Vec<ComplaintView> {
    complaints.iter().map(|c| to_view(state, c)).collect()
}

fn find(state: &AppState, id: u64) -> Result<Complaint> {
    state
        .db
        .get_complaint(id)
        .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))
}

/// Owners see their own complaints; admins see everything.
fn require_owner_or_admin(caller: &AuthUser, complaint: &Complaint) -> Result<()> {
    if caller.is_admin() || complaint.user_id == caller.user_id {
        Ok(())
    } else {
        Err(AppError::forbidden("Complaint belongs to another user"))
    }
}

fn require_editable(caller: &AuthUser, complaint: &Complaint) -> Result<()> {
    if caller.is_admin() || complaint.is_owned_and_open(caller.user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the owner of an OPEN complaint or an administrator can edit it",
        ))
    }
}

// ─── Handlers ────────────────────────────────────────────────

/// File a new complaint as the calling user.
async fn create(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ComplaintView>)> {
    let ComplaintForm { draft, image } = read_complaint_form(multipart).await?;

    let location = state.db.find_or_create_location(&draft.location_address);
    let image_url = store_image(&state, image).await?;

    let complaint = state.db.insert_complaint(NewComplaint {
        title: draft.title.trim().to_string(),
        description: draft.description,
        category: draft.category,
        severity: draft.severity,
        location_id: location.id,
        coordinates: draft.coordinates,
        user_id: caller.user_id,
        image_url,
        timestamp: chrono::Utc::now(),
    })?;

    tracing::info!(
        complaint_id = complaint.id,
        user_id = caller.user_id,
        location = %location.area_name,
        has_image = complaint.image_url.is_some(),
        "Complaint filed"
    );

    Ok((StatusCode::CREATED, Json(to_view(&state, &complaint))))
}

/// List every complaint (admin only).
async fn list_all(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<ComplaintView>>> {
    caller.require_admin()?;
    Ok(Json(to_views(&state, &state.db.list_complaints())))
}

/// List complaints filed by one user.
async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<ComplaintView>>> {
    caller.require_self_or_admin(user_id)?;
    Ok(Json(to_views(&state, &state.db.complaints_for_user(user_id))))
}

/// Get one complaint.
async fn get_one(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<ComplaintView>> {
    let complaint = find(&state, id)?;
    require_owner_or_admin(&caller, &complaint)?;
    Ok(Json(to_view(&state, &complaint)))
}

/// Edit a complaint's fields.
///
/// Admins may edit any complaint; owners only while it is still `OPEN`.
/// Status is not touched here; see [`update_status`].
async fn update(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<ComplaintView>> {
    // Checked up front to reject before reading the upload, and again under
    // the row lock since the status may change while the body streams in.
    require_editable(&caller, &find(&state, id)?)?;

    let ComplaintForm { draft, image } = read_complaint_form(multipart).await?;
    let location = state.db.find_or_create_location(&draft.location_address);
    let image_url = store_image(&state, image).await?;

    let updated = state
        .db
        .edit_complaint(id, location.id, |c| {
            require_editable(&caller, c)?;
            c.title = draft.title.trim().to_string();
            c.description = draft.description;
            if draft.category.is_some() {
                c.category = draft.category;
            }
            if draft.severity.is_some() {
                c.severity = draft.severity;
            }
            if draft.coordinates.is_some() {
                c.coordinates = draft.coordinates;
            }
            if image_url.is_some() {
                c.image_url = image_url;
            }
            Ok(())
        })?;

    tracing::info!(complaint_id = id, user_id = caller.user_id, "Complaint updated");
    Ok(Json(to_view(&state, &updated)))
}

/// Move a complaint to a new status (admin only).
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
    Query(query): Query<StatusQuery>,
) -> Result<String> {
    caller.require_admin()?;

    let updated = state
        .db
        .update_complaint(id, |c| c.status = query.status)
        .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;

    tracing::info!(
        complaint_id = id,
        admin_id = caller.user_id,
        status = %updated.status,
        "Complaint status changed"
    );
    Ok(format!("complaint status updated to: {}", query.status))
}

/// Delete a complaint. Only `RESOLVED` complaints can be deleted.
async fn delete_one(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    let complaint = find(&state, id)?;
    require_owner_or_admin(&caller, &complaint)?;

    state.db.delete_resolved_complaint(id)?;

    tracing::info!(complaint_id = id, user_id = caller.user_id, "Complaint deleted");
    Ok(StatusCode::NO_CONTENT)
}
