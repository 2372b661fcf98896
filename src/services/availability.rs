//! Event availability and status evaluation
//!
//! Pure functions of `(event, now)`. The same evaluation gates registration
//! server-side and drives the user-facing status line, so it lives in one
//! place and has no side effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::event::Event;
use crate::utils::errors::RegistrationError;

/// Lifecycle phase of an event relative to a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Before the registration window opens
    Upcoming,
    /// Within the registration window and before the event starts
    RegistrationOpen,
    /// After the window, before the event starts
    RegistrationClosed,
    /// Within the event window
    Ongoing,
    /// After the event ends
    Ended,
}

impl EventPhase {
    /// Registration is permitted only in this phase
    pub fn can_register(&self) -> bool {
        matches!(self, EventPhase::RegistrationOpen)
    }

    /// User-facing status line
    pub fn message(&self) -> &'static str {
        match self {
            EventPhase::Upcoming => "Registration Opens Soon",
            EventPhase::RegistrationOpen => "Registration Open",
            EventPhase::RegistrationClosed => "Registration Closed",
            EventPhase::Ongoing => "Event Ongoing",
            EventPhase::Ended => "Event Ended",
        }
    }
}

/// Compute the phase of an event at the given instant.
///
/// The registration window is inclusive on both ends. An event whose
/// registration window overlaps its own start reports `Ongoing` once the
/// event has started, regardless of the window.
pub fn event_phase(event: &Event, now: DateTime<Utc>) -> EventPhase {
    if now < event.registration_starts_at {
        EventPhase::Upcoming
    } else if now <= event.registration_ends_at && now < event.starts_at {
        EventPhase::RegistrationOpen
    } else if now < event.starts_at {
        EventPhase::RegistrationClosed
    } else if now <= event.ends_at {
        EventPhase::Ongoing
    } else {
        EventPhase::Ended
    }
}

/// True when registration is currently permitted
pub fn is_registration_open(event: &Event, now: DateTime<Utc>) -> bool {
    event_phase(event, now).can_register()
}

/// The rejection to report when registration is not permitted right now.
/// Not-yet-open and already-closed are distinct user-facing messages.
pub fn registration_window_rejection(
    event: &Event,
    now: DateTime<Utc>,
) -> Option<RegistrationError> {
    match event_phase(event, now) {
        EventPhase::RegistrationOpen => None,
        EventPhase::Upcoming => Some(RegistrationError::RegistrationNotOpen),
        _ => Some(RegistrationError::RegistrationClosed),
    }
}
