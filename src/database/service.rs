//! Database service layer
//!
//! This module provides a high-level interface to database operations

use serde::{Deserialize, Serialize};

use crate::database::{
    DatabasePool, EventRepository, ParticipantRepository, PaymentRepository, ProfileRepository,
    TeamRepository,
};
use crate::models::event::{Event, EventType};
use crate::models::participant::Participant;
use crate::models::payment::PaymentWithContext;
use crate::models::profile::Participation;
use crate::models::team::TeamWithMembers;
use crate::utils::errors::FestregError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub profiles: ProfileRepository,
    pub events: EventRepository,
    pub teams: TeamRepository,
    pub participants: ParticipantRepository,
    pub payments: PaymentRepository,
}

/// Roster of an event for the admin view: teams with members for team
/// events, a flat participant list for individual events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventRoster {
    Individual {
        event: Event,
        participants: Vec<Participant>,
    },
    Team {
        event: Event,
        teams: Vec<TeamWithMembers>,
    },
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            teams: TeamRepository::new(pool.clone()),
            participants: ParticipantRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool),
        }
    }

    /// Load the full roster of an event
    pub async fn event_roster(&self, event_id: i64) -> Result<EventRoster, FestregError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(FestregError::EventNotFound { event_id })?;

        match event.event_type {
            EventType::Individual => {
                let participants = self.participants.list_for_event(event_id).await?;
                Ok(EventRoster::Individual {
                    event,
                    participants,
                })
            }
            EventType::Team => {
                let teams = self.teams.list_for_event_with_members(event_id).await?;
                Ok(EventRoster::Team { event, teams })
            }
        }
    }

    /// All registrations owned by an email address, with event and team
    /// context. Backs the user dashboard.
    pub async fn participations_for(
        &self,
        email: &str,
    ) -> Result<Vec<Participation>, FestregError> {
        let participants = self.participants.list_for_email(email).await?;

        let mut participations = Vec::with_capacity(participants.len());
        for participant in participants {
            let Some(event) = self.events.find_by_id(participant.event_id).await? else {
                continue;
            };
            let team = match participant.team_id {
                Some(team_id) => self.teams.find_by_id(team_id).await?,
                None => None,
            };
            participations.push(Participation {
                participant,
                event,
                team,
            });
        }

        Ok(participations)
    }

    /// Paginated payment listing with payer and event context
    pub async fn payments_overview(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PaymentWithContext>, i64), FestregError> {
        let (payments, total) = futures::try_join!(
            self.payments.list_with_context(limit, offset),
            self.payments.count()
        )?;

        Ok((payments, total))
    }
}
