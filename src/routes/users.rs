// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: registration, login, and user administration.

use crate::db::NewUser;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, Role, UserSummary};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

/// Public account routes.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
}

/// Account routes that require a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user).delete(delete_user))
}

/// Register a new citizen account.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>)> {
    request.validate()?;

    let password_hash = state.passwords.hash_blocking(request.password).await?;
    let user = state.db.insert_user(NewUser {
        name: request.name,
        email: request.email,
        password_hash,
        role: Role::User,
    })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user.summary())))
}

/// Exchange credentials for a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let rejected = || {
        tracing::info!("Login rejected: invalid credentials");
        AppError::InvalidCredentials
    };
    let user = state.db.find_user_by_email(&request.email).ok_or_else(rejected)?;
    if !state
        .passwords
        .verify_blocking(request.password, user.password_hash.clone())
        .await
    {
        return Err(rejected());
    }

    let token = create_jwt(
        &user,
        &state.config.jwt_signing_key,
        state.config.jwt_ttl_hours,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    }))
}

/// List every account (admin only).
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<UserSummary>>> {
    caller.require_admin()?;
    let users = state.db.list_users().iter().map(|u| u.summary()).collect();
    Ok(Json(users))
}

/// Get one account: the caller's own, or any for an admin.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<UserSummary>> {
    caller.require_self_or_admin(id)?;
    state
        .db
        .get_user(id)
        .map(|u| Json(u.summary()))
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
}

/// Delete an account and its complaints (admin only).
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    caller.require_admin()?;
    if id == caller.user_id {
        return Err(AppError::BadRequest(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    let removed = state
        .db
        .delete_user(id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    tracing::info!(
        user_id = id,
        admin_id = caller.user_id,
        complaints_removed = removed,
        "User deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
