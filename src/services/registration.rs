//! Registration engine
//!
//! Validates and commits individual and team registration requests against
//! event constraints and existing registration state. Preconditions are
//! checked in a fixed order and every rejection carries its user-facing
//! message. Application-level pre-checks are a courtesy; the store's unique
//! constraints are the authoritative guard against concurrent duplicates.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::repositories::{
    unique_violation, EventRepository, ParticipantRepository, TeamRepository,
};
use crate::models::event::{EventAvailability, EventType, EventWithCounts};
use crate::models::participant::{Participant, ParticipantData, RegistrationStatus};
use crate::models::team::{TeamRegistration, TeamRegistrationData};
use crate::services::availability;
use crate::utils::errors::{FestregError, RegistrationError, Result};

const PARTICIPANT_EMAIL_EVENT_KEY: &str = "participants_email_event_id_key";
const TEAM_NAME_EVENT_KEY: &str = "teams_name_event_id_key";

/// Registration service for individual and team sign-ups
#[derive(Debug, Clone)]
pub struct RegistrationService {
    events: EventRepository,
    participants: ParticipantRepository,
    teams: TeamRepository,
}

impl RegistrationService {
    pub fn new(
        events: EventRepository,
        participants: ParticipantRepository,
        teams: TeamRepository,
    ) -> Self {
        Self {
            events,
            participants,
            teams,
        }
    }

    /// Register one person for an individual event.
    ///
    /// A zero-fee event marks the participant paid immediately; everyone
    /// else starts unpaid with the fee snapshotted from the event.
    pub async fn register_individual(
        &self,
        event_id: i64,
        data: ParticipantData,
    ) -> Result<Participant> {
        debug!(event_id = event_id, email = %data.email, "Individual registration requested");

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;

        if let Some(rejection) = availability::registration_window_rejection(&event, Utc::now()) {
            return Err(rejection.into());
        }

        if event.event_type != EventType::Individual {
            return Err(RegistrationError::NotAnIndividualEvent.into());
        }

        if self
            .participants
            .find_by_email_and_event(&data.email, event_id)
            .await?
            .is_some()
        {
            return Err(RegistrationError::AlreadyRegistered.into());
        }

        let fee = event.registration_fee;
        let result = self
            .participants
            .insert(&data, event_id, None, true, fee, fee == 0)
            .await;

        match result {
            Ok(participant) => {
                info!(
                    event_id = event_id,
                    participant_id = participant.id,
                    email = %participant.email,
                    fee = fee,
                    "Participant registered"
                );
                Ok(participant)
            }
            Err(FestregError::Database(err))
                if unique_violation(&err).as_deref() == Some(PARTICIPANT_EMAIL_EVENT_KEY) =>
            {
                // lost the race against a concurrent request with the same email
                warn!(event_id = event_id, email = %data.email, "Duplicate registration caught by constraint");
                Err(RegistrationError::AlreadyRegistered.into())
            }
            Err(err) => Err(err),
        }
    }

    /// Register a team with its full roster for a team event.
    ///
    /// The caller passes the pre-fetched event with its current counts; the
    /// counts are a snapshot, so the team cap stays a soft limit under
    /// concurrent registrations. The team and every member are committed in
    /// one all-or-nothing transaction.
    pub async fn register_team(
        &self,
        event: &EventWithCounts,
        data: TeamRegistrationData,
        leader_email: &str,
    ) -> Result<TeamRegistration> {
        debug!(
            event_id = event.event.id,
            team_name = %data.team_name,
            members = data.participants.len(),
            "Team registration requested"
        );

        validate_team_request(event, &data, Utc::now())?;

        if self
            .teams
            .find_by_name_and_event(&data.team_name, event.event.id)
            .await?
            .is_some()
        {
            return Err(RegistrationError::TeamNameTaken.into());
        }

        let emails: Vec<String> = data.participants.iter().map(|p| p.email.clone()).collect();

        let conflicts = self
            .participants
            .registered_emails(event.event.id, &emails)
            .await?;
        if !conflicts.is_empty() {
            return Err(RegistrationError::ParticipantsAlreadyRegistered { emails: conflicts }.into());
        }

        if let Some(duplicated) = first_duplicate(&emails) {
            return Err(RegistrationError::ParticipantsAlreadyRegistered {
                emails: vec![duplicated],
            }
            .into());
        }

        if !emails.iter().any(|email| email == leader_email) {
            return Err(RegistrationError::LeaderNotInRoster.into());
        }

        let result = self
            .teams
            .create_with_members(&event.event, &data, leader_email)
            .await;

        match result {
            Ok(registration) => {
                info!(
                    event_id = event.event.id,
                    team_id = registration.team.id,
                    team_name = %registration.team.name,
                    members = registration.participants.len(),
                    fee = registration.team.registration_fee,
                    "Team registered"
                );
                Ok(registration)
            }
            Err(FestregError::Database(err)) => match unique_violation(&err).as_deref() {
                Some(TEAM_NAME_EVENT_KEY) => {
                    warn!(event_id = event.event.id, team_name = %data.team_name, "Duplicate team name caught by constraint");
                    Err(RegistrationError::TeamNameTaken.into())
                }
                Some(PARTICIPANT_EMAIL_EVENT_KEY) => {
                    // the transaction rolled back; name the conflicts if they
                    // are visible, otherwise report a plain duplicate
                    let conflicts = self
                        .participants
                        .registered_emails(event.event.id, &emails)
                        .await?;
                    if conflicts.is_empty() {
                        Err(RegistrationError::AlreadyRegistered.into())
                    } else {
                        Err(RegistrationError::ParticipantsAlreadyRegistered { emails: conflicts }
                            .into())
                    }
                }
                _ => Err(FestregError::Database(err)),
            },
            Err(err) => Err(err),
        }
    }

    /// Per-user registration and payment state for an event.
    ///
    /// Team members report the team's paid flag; team payment is
    /// all-or-nothing, so the member's own flag is ignored.
    pub async fn check_registration_status(
        &self,
        event_id: i64,
        email: &str,
    ) -> Result<RegistrationStatus> {
        let Some(found) = self
            .participants
            .find_by_email_with_team(email, event_id)
            .await?
        else {
            return Ok(RegistrationStatus::not_registered());
        };

        Ok(RegistrationStatus {
            is_registered: true,
            is_paid: found.is_paid(),
            is_team_leader: found.participant.is_leader,
            team: found.team,
            participant: Some(found.participant),
        })
    }

    /// Aggregate availability for the registration form gate, independent of
    /// any particular user.
    pub async fn check_event_availability(&self, event_id: i64) -> Result<EventAvailability> {
        let event = self
            .events
            .find_with_counts(event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;

        let is_registration_closed = !availability::is_registration_open(&event.event, Utc::now());
        let is_full = event
            .event
            .max_teams
            .map(|max| event.team_count >= max as i64)
            .unwrap_or(false);

        Ok(EventAvailability {
            can_register: !is_registration_closed && !is_full,
            is_registration_closed,
            is_full,
            available_slots: event
                .event
                .max_teams
                .map(|max| (max as i64 - event.team_count).max(0)),
            total_slots: event.event.max_teams,
        })
    }

    /// Of the given emails, those already registered for the event. Used by
    /// the team form to flag conflicts before submission.
    pub async fn emails_already_registered(
        &self,
        event_id: i64,
        emails: &[String],
    ) -> Result<Vec<String>> {
        self.participants.registered_emails(event_id, emails).await
    }
}

/// Validate a team registration request against the event value object.
/// Checks run in a fixed order: window, event type, roster size, team cap.
fn validate_team_request(
    event: &EventWithCounts,
    data: &TeamRegistrationData,
    now: chrono::DateTime<Utc>,
) -> std::result::Result<(), RegistrationError> {
    if let Some(rejection) = availability::registration_window_rejection(&event.event, now) {
        return Err(rejection);
    }

    if event.event.event_type != EventType::Team {
        return Err(RegistrationError::NotATeamEvent);
    }

    let roster_size = data.participants.len() as i32;

    if let Some(min) = event.event.min_participants_per_team {
        if roster_size < min {
            return Err(RegistrationError::TeamTooSmall { min });
        }
    }

    if let Some(max) = event.event.max_participants_per_team {
        if roster_size > max {
            return Err(RegistrationError::TeamTooLarge { max });
        }
    }

    if let Some(max_teams) = event.event.max_teams {
        if event.team_count >= max_teams as i64 {
            return Err(RegistrationError::EventFull);
        }
    }

    Ok(())
}

/// First email that appears more than once in the roster
fn first_duplicate(emails: &[String]) -> Option<String> {
    let mut seen = std::collections::HashSet::new();
    emails
        .iter()
        .find(|email| !seen.insert(email.as_str()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Event;
    use chrono::{Duration, TimeZone, Utc};

    fn team_event(fee: i64, min: Option<i32>, max: Option<i32>, max_teams: Option<i32>) -> Event {
        let base = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        Event {
            id: 2,
            name: "Cricket".to_string(),
            description: None,
            event_type: EventType::Team,
            registration_fee: fee,
            registration_starts_at: base - Duration::days(1),
            registration_ends_at: base + Duration::days(7),
            starts_at: base + Duration::days(10),
            ends_at: base + Duration::days(12),
            min_participants_per_team: min,
            max_participants_per_team: max,
            max_teams,
            created_at: base,
            updated_at: base,
        }
    }

    fn with_counts(event: Event, team_count: i64) -> EventWithCounts {
        EventWithCounts {
            event,
            team_count,
            participant_count: 0,
        }
    }

    fn roster(n: usize) -> TeamRegistrationData {
        TeamRegistrationData {
            team_name: "Night Owls".to_string(),
            team_description: None,
            participants: (0..n)
                .map(|i| ParticipantData {
                    name: format!("Member {}", i),
                    email: format!("member{}@example.com", i),
                    phone: "+911234567890".to_string(),
                    year: None,
                    course: None,
                })
                .collect(),
        }
    }

    fn now_open() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_roster_below_minimum_is_rejected() {
        let event = with_counts(team_event(100, Some(2), Some(4), None), 0);
        let err = validate_team_request(&event, &roster(1), now_open()).unwrap_err();
        assert_eq!(err, RegistrationError::TeamTooSmall { min: 2 });
    }

    #[test]
    fn test_roster_above_maximum_is_rejected() {
        let event = with_counts(team_event(100, Some(2), Some(4), None), 0);
        let err = validate_team_request(&event, &roster(5), now_open()).unwrap_err();
        assert_eq!(err, RegistrationError::TeamTooLarge { max: 4 });
    }

    #[test]
    fn test_unbounded_roster_sizes_pass() {
        let event = with_counts(team_event(100, None, None, None), 0);
        assert!(validate_team_request(&event, &roster(11), now_open()).is_ok());
    }

    #[test]
    fn test_full_event_is_rejected() {
        let event = with_counts(team_event(100, Some(2), Some(4), Some(1)), 1);
        let err = validate_team_request(&event, &roster(3), now_open()).unwrap_err();
        assert_eq!(err, RegistrationError::EventFull);
    }

    #[test]
    fn test_individual_event_rejects_team_registration() {
        let mut event = team_event(100, None, None, None);
        event.event_type = EventType::Individual;
        let err =
            validate_team_request(&with_counts(event, 0), &roster(3), now_open()).unwrap_err();
        assert_eq!(err, RegistrationError::NotATeamEvent);
    }

    #[test]
    fn test_window_checked_before_event_type() {
        let mut event = team_event(100, None, None, None);
        event.event_type = EventType::Individual;
        let before_window = event.registration_starts_at - Duration::days(1);
        let err =
            validate_team_request(&with_counts(event, 0), &roster(3), before_window).unwrap_err();
        assert_eq!(err, RegistrationError::RegistrationNotOpen);
    }

    #[test]
    fn test_closed_window_is_distinct_from_not_open() {
        let event = team_event(100, None, None, None);
        let after_window = event.registration_ends_at + Duration::days(1);
        let err =
            validate_team_request(&with_counts(event, 0), &roster(3), after_window).unwrap_err();
        assert_eq!(err, RegistrationError::RegistrationClosed);
    }

    #[test]
    fn test_first_duplicate_finds_repeats() {
        let emails = vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "a@x.com".to_string(),
        ];
        assert_eq!(first_duplicate(&emails), Some("a@x.com".to_string()));
        assert_eq!(first_duplicate(&emails[..2].to_vec()), None);
    }
}
