// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::error::AppError;
use crate::models::{Role, User};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie that may carry the session token instead of the header.
pub const TOKEN_COOKIE: &str = "cleanstreet_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with 403 unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Administrator role required"))
        }
    }

    /// Fail with 403 unless the caller is `user_id` or an administrator.
    pub fn require_self_or_admin(&self, user_id: u64) -> Result<(), AppError> {
        if self.is_admin() || self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::forbidden("Access to another user's data denied"))
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires valid JWT authentication.
///
/// The token is read from the `Authorization: Bearer` header, falling back
/// to the session cookie. The account must still exist: a token issued to a
/// since-deleted user is rejected.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = match bearer_token(&request) {
        Some(t) => t.to_string(),
        None => jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(StatusCode::UNAUTHORIZED)?,
    };

    let claims = decode_jwt(&token, &state.config.jwt_signing_key).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        StatusCode::UNAUTHORIZED
    })?;

    let user_id: u64 = claims.sub.parse().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = state.db.get_user(user_id) else {
        tracing::warn!(user_id, "Token presented for unknown user");
        return Err(StatusCode::UNAUTHORIZED);
    };

    // Role changes take effect immediately rather than at token expiry.
    let auth_user = AuthUser {
        user_id,
        email: user.email,
        role: user.role,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Decode and validate a session token.
pub fn decode_jwt(token: &str, signing_key: &[u8]) -> jsonwebtoken::errors::Result<Claims> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// Create a JWT for a user session.
pub fn create_jwt(user: &User, signing_key: &[u8], ttl_hours: u64) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iat: now,
        exp: now + (ttl_hours as usize) * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 42,
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_jwt_roundtrip_carries_role() {
        let key = b"test_jwt_key_32_bytes_minimum!!!";
        let token = create_jwt(&user(Role::Admin), key, 1).unwrap();
        let claims = decode_jwt(&token, key).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "pat@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_jwt_wrong_key_rejected() {
        let token = create_jwt(&user(Role::User), b"key-one-key-one-key-one-key-one!", 1).unwrap();
        assert!(decode_jwt(&token, b"key-two-key-two-key-two-key-two!").is_err());
    }

    #[test]
    fn test_role_checks() {
        let admin = AuthUser {
            user_id: 1,
            email: "a@example.com".to_string(),
            role: Role::Admin,
        };
        let citizen = AuthUser {
            user_id: 2,
            email: "c@example.com".to_string(),
            role: Role::User,
        };

        assert!(admin.require_admin().is_ok());
        assert!(admin.require_self_or_admin(2).is_ok());
        assert!(citizen.require_admin().is_err());
        assert!(citizen.require_self_or_admin(2).is_ok());
        assert!(matches!(
            citizen.require_self_or_admin(3),
            Err(AppError::Forbidden(_))
        ));
    }
}
