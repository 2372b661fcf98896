//! Team repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::database::repositories::participant::PARTICIPANT_COLUMNS;
use crate::models::event::Event;
use crate::models::participant::Participant;
use crate::models::team::{Team, TeamRegistration, TeamRegistrationData, TeamWithMembers};
use crate::utils::errors::FestregError;

pub(crate) const TEAM_COLUMNS: &str = "id, name, description, event_id, leader_email, registration_fee, is_paid, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find team by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Team>, FestregError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Find a team by the (name, event) natural key
    pub async fn find_by_name_and_event(
        &self,
        name: &str,
        event_id: i64,
    ) -> Result<Option<Team>, FestregError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE name = $1 AND event_id = $2"
        ))
        .bind(name)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Get team count for an event
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, FestregError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Create a team and all of its members in one all-or-nothing transaction.
    ///
    /// Any member insert failure, including a duplicate caught only by the
    /// (email, event_id) constraint, rolls the whole attempt back so a team
    /// with a partial roster is never visible.
    pub async fn create_with_members(
        &self,
        event: &Event,
        data: &TeamRegistrationData,
        leader_email: &str,
    ) -> Result<TeamRegistration, FestregError> {
        let member_count = data.participants.len() as i64;
        let team_fee = event.registration_fee * member_count;
        let paid = team_fee == 0;

        let mut tx = self.pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            INSERT INTO teams (name, description, event_id, leader_email, registration_fee, is_paid, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(&data.team_name)
        .bind(&data.team_description)
        .bind(event.id)
        .bind(leader_email)
        .bind(team_fee)
        .bind(paid)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mut participants = Vec::with_capacity(data.participants.len());
        for member in &data.participants {
            let participant = sqlx::query_as::<_, Participant>(&format!(
                r#"
                INSERT INTO participants (name, email, phone, year, course, event_id, team_id, is_leader, is_paid, registration_fee, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING {PARTICIPANT_COLUMNS}
                "#
            ))
            .bind(&member.name)
            .bind(&member.email)
            .bind(&member.phone)
            .bind(&member.year)
            .bind(&member.course)
            .bind(event.id)
            .bind(team.id)
            .bind(member.email == leader_email)
            .bind(paid)
            .bind(event.registration_fee)
            .bind(Utc::now())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            participants.push(participant);
        }

        tx.commit().await?;

        Ok(TeamRegistration { team, participants })
    }

    /// List an event's teams with their members, used by the admin roster view
    pub async fn list_for_event_with_members(
        &self,
        event_id: i64,
    ) -> Result<Vec<TeamWithMembers>, FestregError> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(teams.len());
        for team in teams {
            let members = sqlx::query_as::<_, Participant>(&format!(
                "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE team_id = $1 ORDER BY created_at ASC"
            ))
            .bind(team.id)
            .fetch_all(&self.pool)
            .await?;

            result.push(TeamWithMembers { team, members });
        }

        Ok(result)
    }
}
