//! Participant repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::database::repositories::team::TEAM_COLUMNS;
use crate::models::participant::{Participant, ParticipantData, ParticipantWithTeam};
use crate::models::team::Team;
use crate::utils::errors::FestregError;

pub(crate) const PARTICIPANT_COLUMNS: &str = "id, name, email, phone, year, course, event_id, team_id, is_leader, is_paid, registration_fee, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single participant. The (email, event_id) unique constraint is
    /// the authoritative duplicate guard; violations bubble up as database
    /// errors for the caller to translate.
    pub async fn insert(
        &self,
        data: &ParticipantData,
        event_id: i64,
        team_id: Option<i64>,
        is_leader: bool,
        registration_fee: i64,
        is_paid: bool,
    ) -> Result<Participant, FestregError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            r#"
            INSERT INTO participants (name, email, phone, year, course, event_id, team_id, is_leader, is_paid, registration_fee, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.year)
        .bind(&data.course)
        .bind(event_id)
        .bind(team_id)
        .bind(is_leader)
        .bind(is_paid)
        .bind(registration_fee)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Find a participant by the (email, event) natural key
    pub async fn find_by_email_and_event(
        &self,
        email: &str,
        event_id: i64,
    ) -> Result<Option<Participant>, FestregError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE email = $1 AND event_id = $2"
        ))
        .bind(email)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    /// Find participant by ID with their team loaded, when they belong to one
    pub async fn find_with_team(
        &self,
        id: i64,
    ) -> Result<Option<ParticipantWithTeam>, FestregError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(participant) = participant else {
            return Ok(None);
        };

        let team = match participant.team_id {
            Some(team_id) => {
                sqlx::query_as::<_, Team>(&format!(
                    "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
                ))
                .bind(team_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };

        Ok(Some(ParticipantWithTeam { participant, team }))
    }

    /// Find participant by (email, event) with their team loaded
    pub async fn find_by_email_with_team(
        &self,
        email: &str,
        event_id: i64,
    ) -> Result<Option<ParticipantWithTeam>, FestregError> {
        let Some(participant) = self.find_by_email_and_event(email, event_id).await? else {
            return Ok(None);
        };

        self.find_with_team(participant.id).await
    }

    /// Of the given emails, return those already registered for the event.
    /// Used to report team-roster conflicts with the specific addresses.
    pub async fn registered_emails(
        &self,
        event_id: i64,
        emails: &[String],
    ) -> Result<Vec<String>, FestregError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT email FROM participants WHERE event_id = $1 AND email = ANY($2) ORDER BY email ASC",
        )
        .bind(event_id)
        .bind(emails)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(email,)| email).collect())
    }

    /// List participants of an event, oldest registration first
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Participant>, FestregError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    /// List members of a team
    pub async fn list_for_team(&self, team_id: i64) -> Result<Vec<Participant>, FestregError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE team_id = $1 ORDER BY created_at ASC"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    /// List every registration for an email address, most recent first
    pub async fn list_for_email(&self, email: &str) -> Result<Vec<Participant>, FestregError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE email = $1 ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    /// Get participant count for an event
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, FestregError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM participants WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Count registrations owned by an email address across all events
    pub async fn count_for_email(&self, email: &str) -> Result<i64, FestregError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM participants WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
