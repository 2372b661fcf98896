//! Profile repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::profile::{CreateProfileRequest, Profile, UpdateProfileRequest};
use crate::utils::errors::FestregError;

const PROFILE_COLUMNS: &str = "id, name, email, phone, registration_number, course, year, is_admin, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new profile
    pub async fn create(&self, request: CreateProfileRequest) -> Result<Profile, FestregError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (name, email, phone, registration_number, course, year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.registration_number)
        .bind(request.course)
        .bind(request.year)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Profile>, FestregError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by email, the natural key supplied by the identity provider
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, FestregError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Update profile, keeping unspecified fields unchanged
    pub async fn update(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<Profile, FestregError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                registration_number = COALESCE($4, registration_number),
                course = COALESCE($5, course),
                year = COALESCE($6, year),
                updated_at = $7
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.phone)
        .bind(request.registration_number)
        .bind(request.course)
        .bind(request.year)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Grant or revoke the admin flag
    pub async fn set_admin(&self, id: i64, is_admin: bool) -> Result<Profile, FestregError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET is_admin = $2, updated_at = $3
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_admin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Delete profile
    pub async fn delete(&self, id: i64) -> Result<(), FestregError> {
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List profiles with pagination, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Profile>, FestregError> {
        let profiles = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Count total profiles
    pub async fn count(&self) -> Result<i64, FestregError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
