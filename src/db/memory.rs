// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, unique email index)
//! - Complaints (reports and their lifecycle)
//! - Locations (find-or-create by area name)
//! - Feedback (write-mostly submissions)
//!
//! Every table is a `DashMap` keyed by a sequential id, so handlers on
//! different tokio workers never block each other on unrelated rows.

use crate::error::AppError;
use crate::models::{
    Complaint, Coordinates, Feedback, FeedbackRequest, Location, LocationRequest, Role, Status,
    User,
};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fields needed to create a user. The id and timestamp are assigned here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Fields needed to create a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub severity: Option<u8>,
    pub location_id: u64,
    pub coordinates: Option<Coordinates>,
    pub user_id: u64,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: DashMap<u64, User>,
    /// lowercased email -> user id
    emails: DashMap<String, u64>,
    complaints: DashMap<u64, Complaint>,
    locations: DashMap<u64, Location>,
    /// area name -> location id
    areas: DashMap<String, u64>,
    feedback: DashMap<u64, Feedback>,
    next_user_id: AtomicU64,
    next_complaint_id: AtomicU64,
    next_location_id: AtomicU64,
    next_feedback_id: AtomicU64,
}

/// Ids start at 1 so that 0 never names a real row.
fn next_id(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed) + 1
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shared handle to the application tables.
#[derive(Clone, Default)]
pub struct Store {
    tables: Arc<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a user, failing with `Conflict` if the email is taken.
    pub fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let email = normalize_email(&new_user.email);

        // Hold the email entry while inserting so concurrent registrations
        // of one address cannot both succeed.
        match self.tables.emails.entry(email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "An account with email {} already exists",
                email
            ))),
            Entry::Vacant(slot) => {
                let user = User {
                    id: next_id(&self.tables.next_user_id),
                    name: new_user.name.trim().to_string(),
                    email,
                    password_hash: new_user.password_hash,
                    role: new_user.role,
                    created_at: Utc::now().to_rfc3339(),
                };
                self.tables.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    pub fn get_user(&self, id: u64) -> Option<User> {
        self.tables.users.get(&id).map(|u| u.value().clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let id = *self.tables.emails.get(&normalize_email(email))?;
        self.get_user(id)
    }

    /// All users ordered by id.
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.tables.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Delete a user and every complaint they filed.
    ///
    /// Returns the number of complaints removed alongside the account, or
    /// `None` if the user did not exist.
    pub fn delete_user(&self, id: u64) -> Option<usize> {
        let (_, user) = self.tables.users.remove(&id)?;
        self.tables.emails.remove(&user.email);

        let before = self.tables.complaints.len();
        self.tables.complaints.retain(|_, c| c.user_id != id);
        Some(before.saturating_sub(self.tables.complaints.len()))
    }

    // ─── Complaint Operations ────────────────────────────────────

    /// Insert a complaint. New complaints always start `OPEN`.
    ///
    /// Fails with `Conflict` if the location was deleted after it was looked
    /// up; the location stays read-locked until the complaint is in place.
    pub fn insert_complaint(&self, new: NewComplaint) -> Result<Complaint, AppError> {
        let _location = self.locked_location(new.location_id)?;
        let complaint = Complaint {
            id: next_id(&self.tables.next_complaint_id),
            title: new.title,
            description: new.description,
            category: new.category,
            severity: new.severity,
            location_id: new.location_id,
            coordinates: new.coordinates,
            status: Status::Open,
            user_id: new.user_id,
            image_url: new.image_url,
            timestamp: new.timestamp,
        };
        self.tables
            .complaints
            .insert(complaint.id, complaint.clone());
        Ok(complaint)
    }

    pub fn get_complaint(&self, id: u64) -> Option<Complaint> {
        self.tables.complaints.get(&id).map(|c| c.value().clone())
    }

    /// All complaints ordered by id.
    pub fn list_complaints(&self) -> Vec<Complaint> {
        let mut complaints: Vec<Complaint> =
            self.tables.complaints.iter().map(|c| c.value().clone()).collect();
        complaints.sort_by_key(|c| c.id);
        complaints
    }

    /// Complaints filed by `user_id`, ordered by id.
    pub fn complaints_for_user(&self, user_id: u64) -> Vec<Complaint> {
        let mut complaints: Vec<Complaint> = self
            .tables
            .complaints
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.value().clone())
            .collect();
        complaints.sort_by_key(|c| c.id);
        complaints
    }

    /// Apply `update` to a complaint in place and return the new value.
    pub fn update_complaint<F>(&self, id: u64, update: F) -> Option<Complaint>
    where
        F: FnOnce(&mut Complaint),
    {
        let mut entry = self.tables.complaints.get_mut(&id)?;
        update(entry.value_mut());
        Some(entry.value().clone())
    }

    /// Edit a complaint and move it to `location_id` in one step.
    ///
    /// `edit` runs under the complaint's write lock, so any permission check
    /// it makes sees the current status; returning an error leaves the
    /// complaint untouched as long as `edit` checks before it mutates.
    pub fn edit_complaint<F>(
        &self,
        id: u64,
        location_id: u64,
        edit: F,
    ) -> Result<Complaint, AppError>
    where
        F: FnOnce(&mut Complaint) -> Result<(), AppError>,
    {
        let _location = self.locked_location(location_id)?;
        let mut entry = self
            .tables
            .complaints
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;
        edit(entry.value_mut())?;
        entry.value_mut().location_id = location_id;
        Ok(entry.value().clone())
    }

    /// Delete a complaint, but only once it is `RESOLVED`.
    ///
    /// The status check and the removal happen under the same shard lock,
    /// so a concurrent status change cannot slip in between them.
    pub fn delete_resolved_complaint(&self, id: u64) -> Result<Complaint, AppError> {
        if let Some((_, removed)) = self
            .tables
            .complaints
            .remove_if(&id, |_, c| c.status == Status::Resolved)
        {
            return Ok(removed);
        }

        match self.tables.complaints.get(&id) {
            Some(c) => Err(AppError::Conflict(format!(
                "Complaint {} is {}; only RESOLVED complaints can be deleted",
                id, c.status
            ))),
            None => Err(AppError::NotFound(format!("Complaint {} not found", id))),
        }
    }

    // ─── Location Operations ─────────────────────────────────────
    //
    // Lock order is `areas`, then `locations`, then `complaints`. No
    // operation holds a guard on a later table while taking an earlier one.

    /// Read guard on a location, or `Conflict` if it no longer exists.
    fn locked_location(
        &self,
        id: u64,
    ) -> Result<dashmap::mapref::one::Ref<'_, u64, Location>, AppError> {
        self.tables
            .locations
            .get(&id)
            .ok_or_else(|| AppError::Conflict(format!("Location {} was removed", id)))
    }

    /// Look up a location by area name, creating it if absent.
    pub fn find_or_create_location(&self, area_name: &str) -> Location {
        let key = area_name.trim().to_string();
        loop {
            let id = *self.tables.areas.entry(key.clone()).or_insert_with(|| {
                let location = Location {
                    id: next_id(&self.tables.next_location_id),
                    area_name: key.clone(),
                    city: None,
                    pincode: None,
                };
                let id = location.id;
                self.tables.locations.insert(id, location);
                id
            });

            if let Some(location) = self.get_location(id) {
                return location;
            }
            // Deleted between the two lookups; drop the stale name and retry.
            self.tables.areas.remove_if(&key, |_, v| *v == id);
        }
    }

    pub fn get_location(&self, id: u64) -> Option<Location> {
        self.tables.locations.get(&id).map(|l| l.value().clone())
    }

    /// All locations ordered by id.
    pub fn list_locations(&self) -> Vec<Location> {
        let mut locations: Vec<Location> =
            self.tables.locations.iter().map(|l| l.value().clone()).collect();
        locations.sort_by_key(|l| l.id);
        locations
    }

    /// Add a location; its area name must not already be registered.
    pub fn insert_location(&self, request: LocationRequest) -> Result<Location, AppError> {
        let key = request.area_name.trim().to_string();
        match self.tables.areas.entry(key.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Location '{}' already exists",
                key
            ))),
            Entry::Vacant(slot) => {
                let location = Location {
                    id: next_id(&self.tables.next_location_id),
                    area_name: key,
                    city: request.city,
                    pincode: request.pincode,
                };
                self.tables.locations.insert(location.id, location.clone());
                slot.insert(location.id);
                Ok(location)
            }
        }
    }

    /// Replace a location's fields, keeping the area-name index in step.
    ///
    /// A new name is reserved in the index before the row is touched. If the
    /// row changed name in the meantime the reservation is released and the
    /// update starts over.
    pub fn update_location(
        &self,
        id: u64,
        request: LocationRequest,
    ) -> Result<Location, AppError> {
        let new_name = request.area_name.trim().to_string();
        loop {
            let old_name = self
                .get_location(id)
                .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))?
                .area_name;
            let renaming = old_name != new_name;

            if renaming {
                match self.tables.areas.entry(new_name.clone()) {
                    Entry::Occupied(_) => {
                        return Err(AppError::Conflict(format!(
                            "Location '{}' already exists",
                            new_name
                        )))
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(id);
                    }
                }
            }

            let updated = match self.tables.locations.get_mut(&id) {
                Some(mut entry) if entry.area_name == old_name => {
                    entry.area_name = new_name.clone();
                    entry.city = request.city.clone();
                    entry.pincode = request.pincode.clone();
                    Some(entry.value().clone())
                }
                _ => None,
            };

            match updated {
                Some(location) => {
                    if renaming {
                        self.tables.areas.remove_if(&old_name, |_, v| *v == id);
                    }
                    return Ok(location);
                }
                None if renaming => {
                    self.tables.areas.remove_if(&new_name, |_, v| *v == id);
                }
                None => {}
            }
        }
    }

    /// Delete a location that no complaint refers to.
    ///
    /// The reference check runs under the location's write lock, and
    /// complaint writes hold its read lock, so neither can slip past the other.
    pub fn delete_location(&self, id: u64) -> Result<(), AppError> {
        let removed = self.tables.locations.remove_if(&id, |_, _| {
            !self.tables.complaints.iter().any(|c| c.location_id == id)
        });

        match removed {
            Some((_, location)) => {
                self.tables
                    .areas
                    .remove_if(&location.area_name, |_, v| *v == id);
                Ok(())
            }
            None if self.tables.locations.contains_key(&id) => Err(AppError::Conflict(format!(
                "Location {} is referenced by complaints",
                id
            ))),
            None => Err(AppError::NotFound(format!("Location {} not found", id))),
        }
    }

    // ─── Feedback Operations ─────────────────────────────────────

    pub fn insert_feedback(&self, request: FeedbackRequest) -> Feedback {
        let feedback = Feedback {
            id: next_id(&self.tables.next_feedback_id),
            subject: request.subject,
            message: request.message,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
        };
        self.tables.feedback.insert(feedback.id, feedback.clone());
        feedback
    }

    /// All feedback ordered by id.
    pub fn list_feedback(&self) -> Vec<Feedback> {
        let mut feedback: Vec<Feedback> = self.tables.feedback.iter().map(|f| f.value().clone()).collect();
        feedback.sort_by_key(|f| f.id);
        feedback
    }
}
