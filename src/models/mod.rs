// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models shared by the API server and the client.

pub mod complaint;
pub mod feedback;
pub mod location;
pub mod user;

pub use complaint::{
    Complaint, ComplaintDraft, ComplaintLocation, ComplaintView, ContactInfo, Coordinates, Status,
};
pub use feedback::{Feedback, FeedbackRequest};
pub use location::{Location, LocationRequest};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, Role, User, UserSummary};
