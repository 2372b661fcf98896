//! Test data helpers for creating test objects

use chrono::{DateTime, Duration, Utc};
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use festreg::models::event::{CreateEventRequest, EventType};
use festreg::models::participant::ParticipantData;
use festreg::models::team::TeamRegistrationData;

/// Unique email so concurrent test runs never collide on the
/// (email, event_id) constraint
pub fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4().simple())
}

/// Unique team name for the same reason
pub fn unique_team_name() -> String {
    format!("Team {}", Uuid::new_v4().simple())
}

/// One participant form submission with a fresh email
pub fn participant_data() -> ParticipantData {
    ParticipantData {
        name: Name().fake(),
        email: unique_email(),
        phone: "+911234567890".to_string(),
        year: Some("3".to_string()),
        course: Some("B.Tech".to_string()),
    }
}

/// A team form submission with `size` fresh members
pub fn team_data(size: usize) -> TeamRegistrationData {
    TeamRegistrationData {
        team_name: unique_team_name(),
        team_description: Some("integration test team".to_string()),
        participants: (0..size).map(|_| participant_data()).collect(),
    }
}

/// An event whose registration window is currently open
pub fn open_event(event_type: EventType, fee: i64) -> CreateEventRequest {
    let now = Utc::now();
    CreateEventRequest {
        name: format!("Event {}", Uuid::new_v4().simple()),
        description: None,
        event_type,
        registration_fee: fee,
        registration_starts_at: now - Duration::days(1),
        registration_ends_at: now + Duration::days(7),
        starts_at: now + Duration::days(10),
        ends_at: now + Duration::days(12),
        min_participants_per_team: None,
        max_participants_per_team: None,
        max_teams: None,
    }
}

/// An event whose registration window closed yesterday
pub fn closed_event(event_type: EventType, fee: i64) -> CreateEventRequest {
    let now = Utc::now();
    CreateEventRequest {
        registration_starts_at: now - Duration::days(10),
        registration_ends_at: now - Duration::days(1),
        starts_at: now + Duration::days(1),
        ends_at: now + Duration::days(2),
        ..open_event(event_type, fee)
    }
}

/// An event whose registration window opens tomorrow
pub fn upcoming_event(event_type: EventType, fee: i64) -> CreateEventRequest {
    let now = Utc::now();
    CreateEventRequest {
        registration_starts_at: now + Duration::days(1),
        registration_ends_at: now + Duration::days(7),
        starts_at: now + Duration::days(10),
        ends_at: now + Duration::days(12),
        ..open_event(event_type, fee)
    }
}

/// Fixed timestamp helper for wire fixtures
pub fn paid_at_fixture() -> DateTime<Utc> {
    DateTime::from_timestamp(1_725_000_000, 0).unwrap()
}
