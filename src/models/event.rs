//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Whether an event is entered by single participants or by teams.
/// Immutable after creation in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Individual,
    Team,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Individual => write!(f, "INDIVIDUAL"),
            EventType::Team => write!(f, "TEAM"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub event_type: EventType,
    /// Whole INR rupees, no minor units
    pub registration_fee: i64,
    pub registration_starts_at: DateTime<Utc>,
    pub registration_ends_at: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// None means unbounded on that side
    pub min_participants_per_team: Option<i32>,
    pub max_participants_per_team: Option<i32>,
    /// None means unlimited teams
    pub max_teams: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event together with its current team and participant counts.
/// The counts are a snapshot taken at read time, not locked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub team_count: i64,
    pub participant_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub registration_fee: i64,
    pub registration_starts_at: DateTime<Utc>,
    pub registration_ends_at: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub min_participants_per_team: Option<i32>,
    pub max_participants_per_team: Option<i32>,
    pub max_teams: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub registration_fee: Option<i64>,
    pub registration_starts_at: Option<DateTime<Utc>>,
    pub registration_ends_at: Option<DateTime<Utc>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub min_participants_per_team: Option<i32>,
    pub max_participants_per_team: Option<i32>,
    pub max_teams: Option<i32>,
}

/// Aggregate answer for the registration form gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAvailability {
    pub can_register: bool,
    pub is_registration_closed: bool,
    pub is_full: bool,
    /// None when the event has no team cap
    pub available_slots: Option<i64>,
    pub total_slots: Option<i32>,
}
