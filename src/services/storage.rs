// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage for complaint images uploaded with multipart requests.
//!
//! Files land in the configured upload directory under a random prefix and
//! are served back at `/uploads/<name>`.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// URL prefix that stored files are served under.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Errors from storing an upload.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Filename contains invalid path sequence: {0}")]
    InvalidName(String),

    #[error("Could not store file {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Writes uploaded files to disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create the upload directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            name: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` and return the public URL path for them.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let clean = clean_file_name(original_name)?;
        let file_name = format!("{}_{}", Uuid::new_v4(), clean);
        let target = self.root.join(&file_name);

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|source| StorageError::Io {
                name: file_name.clone(),
                source,
            })?;

        tracing::debug!(file = %file_name, bytes = bytes.len(), "Stored upload");
        Ok(format!("{}/{}", UPLOADS_PREFIX, file_name))
    }
}

/// Reduce a client-supplied name to a safe single path component.
fn clean_file_name(original: &str) -> Result<String, StorageError> {
    let normalized = original.replace('\\', "/");
    if normalized.split('/').any(|part| part == "..") {
        return Err(StorageError::InvalidName(original.to_string()));
    }

    let base = normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect::<String>();

    if base.is_empty() || base.chars().all(|c| c == '.') {
        Ok("upload".to_string())
    } else {
        Ok(base)
    }
}
