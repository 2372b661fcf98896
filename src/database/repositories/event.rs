//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, EventWithCounts, UpdateEventRequest};
use crate::utils::errors::FestregError;

const EVENT_COLUMNS: &str = "id, name, description, event_type, registration_fee, registration_starts_at, registration_ends_at, starts_at, ends_at, min_participants_per_team, max_participants_per_team, max_teams, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, FestregError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, description, event_type, registration_fee, registration_starts_at, registration_ends_at, starts_at, ends_at, min_participants_per_team, max_participants_per_team, max_teams, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.event_type)
        .bind(request.registration_fee)
        .bind(request.registration_starts_at)
        .bind(request.registration_ends_at)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.min_participants_per_team)
        .bind(request.max_participants_per_team)
        .bind(request.max_teams)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, FestregError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID together with its current team and participant counts
    pub async fn find_with_counts(&self, id: i64) -> Result<Option<EventWithCounts>, FestregError> {
        let event = sqlx::query_as::<_, EventWithCounts>(
            r#"
            SELECT e.*,
                   (SELECT COUNT(*) FROM teams t WHERE t.event_id = e.id) AS team_count,
                   (SELECT COUNT(*) FROM participants p WHERE p.event_id = e.id) AS participant_count
            FROM events e
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event, keeping unspecified fields unchanged
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, FestregError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                registration_fee = COALESCE($4, registration_fee),
                registration_starts_at = COALESCE($5, registration_starts_at),
                registration_ends_at = COALESCE($6, registration_ends_at),
                starts_at = COALESCE($7, starts_at),
                ends_at = COALESCE($8, ends_at),
                min_participants_per_team = COALESCE($9, min_participants_per_team),
                max_participants_per_team = COALESCE($10, max_participants_per_team),
                max_teams = COALESCE($11, max_teams),
                updated_at = $12
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.registration_fee)
        .bind(request.registration_starts_at)
        .bind(request.registration_ends_at)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.min_participants_per_team)
        .bind(request.max_participants_per_team)
        .bind(request.max_teams)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event. Teams, participants and payments cascade at the store level.
    pub async fn delete(&self, id: i64) -> Result<(), FestregError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all events with counts, soonest first
    pub async fn list(&self) -> Result<Vec<EventWithCounts>, FestregError> {
        let events = sqlx::query_as::<_, EventWithCounts>(
            r#"
            SELECT e.*,
                   (SELECT COUNT(*) FROM teams t WHERE t.event_id = e.id) AS team_count,
                   (SELECT COUNT(*) FROM participants p WHERE p.event_id = e.id) AS participant_count
            FROM events e
            ORDER BY e.starts_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, FestregError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
