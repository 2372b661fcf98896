//! Event catalog service implementation
//!
//! Administrator-facing event lifecycle. Window ordering is enforced at
//! creation and not re-validated at registration time.

use tracing::{info, warn};

use crate::database::repositories::EventRepository;
use crate::models::event::{CreateEventRequest, Event, EventWithCounts, UpdateEventRequest};
use crate::utils::errors::{FestregError, Result};

/// Catalog service for event management
#[derive(Debug, Clone)]
pub struct CatalogService {
    events: EventRepository,
}

impl CatalogService {
    pub fn new(events: EventRepository) -> Self {
        Self { events }
    }

    /// Create a new event after validating its windows and bounds
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        validate_event_request(&request)?;

        let event = self.events.create(request).await?;
        info!(event_id = event.id, name = %event.name, event_type = %event.event_type, "Event created");

        Ok(event)
    }

    /// Update an event. Fee edits do not touch existing registrations; fees
    /// are snapshotted onto participants and teams at registration time.
    pub async fn update_event(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(FestregError::EventNotFound { event_id });
        }

        if let Some(fee) = request.registration_fee {
            if fee < 0 {
                return Err(FestregError::InvalidInput(
                    "Registration fee cannot be negative".to_string(),
                ));
            }
        }

        let event = self.events.update(event_id, request).await?;
        info!(event_id = event.id, name = %event.name, "Event updated");

        Ok(event)
    }

    /// Delete an event. Teams, participants and payments cascade.
    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(FestregError::EventNotFound { event_id });
        }

        self.events.delete(event_id).await?;
        warn!(event_id = event_id, "Event deleted with all dependents");

        Ok(())
    }

    /// Get an event by ID
    pub async fn get_event(&self, event_id: i64) -> Result<Option<Event>> {
        self.events.find_by_id(event_id).await
    }

    /// Get an event with its current team and participant counts
    pub async fn get_event_with_counts(&self, event_id: i64) -> Result<Option<EventWithCounts>> {
        self.events.find_with_counts(event_id).await
    }

    /// List all events with counts
    pub async fn list_events(&self) -> Result<Vec<EventWithCounts>> {
        self.events.list().await
    }
}

fn validate_event_request(request: &CreateEventRequest) -> Result<()> {
    if request.name.trim().is_empty() {
        return Err(FestregError::InvalidInput(
            "Event name is required".to_string(),
        ));
    }

    if request.registration_fee < 0 {
        return Err(FestregError::InvalidInput(
            "Registration fee cannot be negative".to_string(),
        ));
    }

    if request.registration_starts_at > request.registration_ends_at {
        return Err(FestregError::InvalidInput(
            "Registration window must start before it ends".to_string(),
        ));
    }

    if request.starts_at > request.ends_at {
        return Err(FestregError::InvalidInput(
            "Event must start before it ends".to_string(),
        ));
    }

    if request.registration_ends_at > request.starts_at {
        return Err(FestregError::InvalidInput(
            "Registration must close at or before the event starts".to_string(),
        ));
    }

    if let (Some(min), Some(max)) = (
        request.min_participants_per_team,
        request.max_participants_per_team,
    ) {
        if min > max {
            return Err(FestregError::InvalidInput(
                "Minimum team size cannot exceed maximum team size".to_string(),
            ));
        }
    }

    if let Some(max_teams) = request.max_teams {
        if max_teams <= 0 {
            return Err(FestregError::InvalidInput(
                "Maximum team count must be positive".to_string(),
            ));
        }
    }

    Ok(())
}
