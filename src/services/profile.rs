//! Profile service implementation
//!
//! Backs the identity store: one profile per authenticated end user, created
//! on the first external sign-in and keyed by the verified email.

use tracing::{debug, info, warn};

use crate::database::repositories::{unique_violation, ParticipantRepository, ProfileRepository};
use crate::models::profile::{CreateProfileRequest, Profile, UpdateProfileRequest};
use crate::utils::errors::{FestregError, Result};

const PROFILE_EMAIL_KEY: &str = "profiles_email_key";

/// Profile service for managing user identities
#[derive(Debug, Clone)]
pub struct ProfileService {
    profiles: ProfileRepository,
    participants: ParticipantRepository,
}

impl ProfileService {
    pub fn new(profiles: ProfileRepository, participants: ParticipantRepository) -> Self {
        Self {
            profiles,
            participants,
        }
    }

    /// Return the profile for an email, creating it on first sign-in.
    ///
    /// Two concurrent first sign-ins race on the email constraint; the loser
    /// reads back the winner's row.
    pub async fn ensure_profile(&self, request: CreateProfileRequest) -> Result<Profile> {
        if let Some(existing) = self.profiles.find_by_email(&request.email).await? {
            debug!(profile_id = existing.id, email = %existing.email, "Profile already exists");
            return Ok(existing);
        }

        let email = request.email.clone();
        match self.profiles.create(request).await {
            Ok(profile) => {
                info!(profile_id = profile.id, email = %profile.email, "Profile created on first sign-in");
                Ok(profile)
            }
            Err(FestregError::Database(err))
                if unique_violation(&err).as_deref() == Some(PROFILE_EMAIL_KEY) =>
            {
                self.profiles
                    .find_by_email(&email)
                    .await?
                    .ok_or(FestregError::ProfileNotFound { email })
            }
            Err(err) => Err(err),
        }
    }

    /// Get profile by email
    pub async fn get_profile(&self, email: &str) -> Result<Option<Profile>> {
        self.profiles.find_by_email(email).await
    }

    /// Update the profile owned by an email address
    pub async fn update_profile(
        &self,
        email: &str,
        request: UpdateProfileRequest,
    ) -> Result<Profile> {
        let existing = self
            .profiles
            .find_by_email(email)
            .await?
            .ok_or_else(|| FestregError::ProfileNotFound {
                email: email.to_string(),
            })?;

        let profile = self.profiles.update(existing.id, request).await?;
        info!(profile_id = profile.id, email = %email, "Profile updated");

        Ok(profile)
    }

    /// Grant or revoke the admin flag
    pub async fn set_admin(&self, profile_id: i64, is_admin: bool) -> Result<Profile> {
        let profile = self.profiles.set_admin(profile_id, is_admin).await?;
        warn!(profile_id = profile_id, is_admin = is_admin, "Admin flag changed");

        Ok(profile)
    }

    /// Delete a profile. Refused while the profile owns any registration.
    pub async fn delete_profile(&self, profile_id: i64) -> Result<()> {
        let profile = self
            .profiles
            .find_by_id(profile_id)
            .await?
            .ok_or(FestregError::ProfileNotFound {
                email: profile_id.to_string(),
            })?;

        let participations = self.participants.count_for_email(&profile.email).await?;
        if participations > 0 {
            return Err(FestregError::InvalidInput(
                "Cannot delete profile with existing event participations".to_string(),
            ));
        }

        self.profiles.delete(profile_id).await?;
        info!(profile_id = profile_id, email = %profile.email, "Profile deleted");

        Ok(())
    }

    /// List profiles with pagination
    pub async fn list_profiles(&self, limit: i64, offset: i64) -> Result<Vec<Profile>> {
        if limit > 100 {
            return Err(FestregError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }

        self.profiles.list(limit, offset).await
    }
}
