//! Profile model
//!
//! One durable record per authenticated end user. Profiles are created on the
//! first external sign-in; the verified email is the natural key that joins a
//! profile to its event registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::event::Event;
use crate::models::participant::Participant;
use crate::models::team::Team;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
}

/// One of a user's registrations, with event and team context for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub participant: Participant,
    pub event: Event,
    pub team: Option<Team>,
}
