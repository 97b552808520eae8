// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client session: the logged-in user and their bearer token.
//!
//! Persisted in a small JSON file that plays the part of browser local
//! storage. The file is a flat string map with two keys: `cleanstreet_user`
//! (the user object as a JSON string, token removed) and `token`.

use crate::client::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key holding the serialized user object.
pub const USER_KEY: &str = "cleanstreet_user";

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// File-backed string map. Every write is flushed immediately.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open the storage file. A missing file is an empty map.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(ClientError::Session { path, source }),
        };
        Ok(Self { path, entries })
    }

    /// Empty storage bound to `path`, replacing whatever is there on the
    /// next write.
    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ClientError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), ClientError> {
        let io_err = |source| ClientError::Session {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        std::fs::write(&self.path, bytes).map_err(io_err)
    }
}

/// The stored user object.
///
/// Fields beyond the four known ones are kept as-is so whatever the login
/// response carried survives a round trip through the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Stored session not read yet.
    Unknown,
    Anonymous,
    Authenticated { role: String },
}

#[derive(Debug)]
pub struct SessionStore {
    storage: LocalStorage,
    user: Option<SessionUser>,
    loaded: bool,
}

impl SessionStore {
    /// A store that has not looked at its file yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            storage: LocalStorage::empty(path.as_ref().to_path_buf()),
            user: None,
            loaded: false,
        }
    }

    /// Open and load in one step.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let mut store = Self::new(path);
        store.load();
        store
    }

    /// Read the stored session. An unreadable file or user entry leaves the
    /// session anonymous.
    pub fn load(&mut self) {
        let path = self.storage.path.clone();
        self.storage = LocalStorage::open(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            LocalStorage::empty(path.clone())
        });

        self.user = self.storage.get(USER_KEY).and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| tracing::warn!(error = %e, "Ignoring malformed stored user"))
                .ok()
        });
        self.loaded = true;
    }

    pub fn state(&self) -> SessionState {
        match (&self.user, self.loaded) {
            (_, false) => SessionState::Unknown,
            (None, true) => SessionState::Anonymous,
            (Some(user), true) => SessionState::Authenticated {
                role: user.role.clone(),
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == "ADMIN")
    }

    /// Store a login payload. The `token` field is split off and kept under
    /// its own key; the rest becomes the session user.
    pub fn login(&mut self, user_data: Value) -> Result<&SessionUser, ClientError> {
        let mut fields = match user_data {
            Value::Object(map) => map,
            other => {
                return Err(ClientError::Json(serde::de::Error::custom(format!(
                    "expected a user object, got {}",
                    other
                ))))
            }
        };
        let token = fields.remove(TOKEN_KEY);
        let without_token = Value::Object(fields);
        let user: SessionUser = serde_json::from_value(without_token.clone())?;

        self.storage.set(USER_KEY, without_token.to_string())?;
        if let Some(Value::String(token)) = token {
            self.storage.set(TOKEN_KEY, token)?;
        }

        tracing::debug!(user_id = user.id, role = %user.role, "Session started");
        self.loaded = true;
        Ok(self.user.insert(user))
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.user = None;
        self.storage.remove(USER_KEY)?;
        self.storage.remove(TOKEN_KEY)
    }
}
