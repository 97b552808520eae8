// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CleanStreet: civic issue reporting.
//!
//! Citizens report local problems (potholes, overflowing bins, broken
//! lights) with a photo and location; administrators triage them through
//! `OPEN`, `IN_PROGRESS` and `RESOLVED`.
//!
//! The crate contains both halves of the system:
//! - the HTTP API server ([`routes`], [`db`], [`services`])
//! - the client application state ([`client`], [`session`], [`guard`],
//!   [`forms`], [`views`]) driven by the `cleanstreet-cli` binary

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod views;

use config::Config;
use db::{NewUser, Store};
use models::Role;
use services::{FileStorage, PasswordService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Store,
    pub storage: FileStorage,
    pub passwords: PasswordService,
}

impl AppState {
    /// Build state around an empty store, creating the upload directory.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let storage = FileStorage::new(&config.upload_dir)?;
        let passwords = PasswordService::new(config.password_cost)?;
        Ok(Self {
            config,
            db: Store::new(),
            storage,
            passwords,
        })
    }

    /// Create the configured administrator account, if any.
    ///
    /// Returns the new admin's id, or `None` when no admin is configured.
    pub fn bootstrap_admin(&self) -> anyhow::Result<Option<u64>> {
        let Some(admin) = &self.config.admin else {
            return Ok(None);
        };

        let password_hash = self.passwords.hash(&admin.password)?;
        let user = self
            .db
            .insert_user(NewUser {
                name: admin.name.clone(),
                email: admin.email.clone(),
                password_hash,
                role: Role::Admin,
            })
            .map_err(|e| anyhow::anyhow!("Admin bootstrap failed: {}", e))?;

        tracing::info!(user_id = user.id, email = %user.email, "Administrator account created");
        Ok(Some(user.id))
    }
}
