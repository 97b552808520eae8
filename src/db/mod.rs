// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (in-memory tables).

pub mod memory;

pub use memory::{NewComplaint, NewUser, Store};
