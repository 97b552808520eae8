// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default front-end origin allowed by CORS.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:4028";

/// Largest accepted complaint image (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Optional administrator account created at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct PasswordCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for argon2id)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Front-end origin for CORS
    pub frontend_url: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session token lifetime
    pub jwt_ttl_hours: u64,
    /// Directory that uploaded images are written to
    pub upload_dir: PathBuf,
    /// Request body cap for multipart uploads
    pub max_upload_bytes: usize,
    pub password_cost: PasswordCost,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();
        if jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SIGNING_KEY",
                "must be at least 32 bytes".to_string(),
            ));
        }

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap {
                name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
                email: email.trim().to_string(),
                password,
            }),
            (Ok(_), Err(_)) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            port: parse_or("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            jwt_signing_key,
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", 24)?,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: MAX_IMAGE_BYTES + 1024 * 1024,
            password_cost: PasswordCost::default(),
            admin,
        })
    }

    /// Deterministic config for tests: cheap password hashing and a
    /// throwaway upload directory.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            jwt_ttl_hours: 24,
            upload_dir: env::temp_dir().join("cleanstreet-test-uploads"),
            max_upload_bytes: MAX_IMAGE_BYTES + 1024 * 1024,
            password_cost: PasswordCost {
                memory_kib: 64,
                iterations: 1,
            },
            admin: None,
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, format!("cannot parse '{}'", raw))),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
