//! Team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::participant::{Participant, ParticipantData};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub event_id: i64,
    pub leader_email: String,
    /// Event fee at creation time multiplied by the member count
    pub registration_fee: i64,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submitted team registration form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRegistrationData {
    pub team_name: String,
    pub team_description: Option<String>,
    pub participants: Vec<ParticipantData>,
}

/// Result of a committed team registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRegistration {
    pub team: Team,
    pub participants: Vec<Participant>,
}

/// Team with its members loaded, used by the admin roster view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamWithMembers {
    pub team: Team,
    pub members: Vec<Participant>,
}
