// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location routes. Any signed-in user can read; administrators manage.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Location, LocationRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/locations", get(list_locations).post(add_location))
        .route(
            "/api/locations/{id}",
            get(get_location).put(update_location).delete(delete_location),
        )
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Json<Vec<Location>> {
    Json(state.db.list_locations())
}

async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Location>> {
    state
        .db
        .get_location(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))
}

async fn add_location(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<LocationRequest>,
) -> Result<(StatusCode, Json<Location>)> {
    caller.require_admin()?;
    request.validate()?;
    let location = state.db.insert_location(request)?;
    tracing::info!(location_id = location.id, area = %location.area_name, "Location added");
    Ok((StatusCode::CREATED, Json(location)))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<Location>> {
    caller.require_admin()?;
    request.validate()?;
    Ok(Json(state.db.update_location(id, request)?))
}

/// Locations still referenced by a complaint are kept (409).
async fn delete_location(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    caller.require_admin()?;
    state.db.delete_location(id)?;
    tracing::info!(location_id = id, "Location deleted");
    Ok(StatusCode::NO_CONTENT)
}
