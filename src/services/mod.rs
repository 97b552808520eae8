// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod password;
pub mod storage;

pub use password::PasswordService;
pub use storage::{FileStorage, StorageError};
