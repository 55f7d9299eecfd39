//! Profile use cases.

use tracing::{info, instrument};
use validator::Validate;

use crate::domain::profile::{ensure_preferences_object, parse_currency_code};
use crate::domain::{AppError, Profile, ProfileChanges, UpdateProfileRequest};

use super::AppService;

impl AppService {
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, AppError> {
        self.db
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        request.validate()?;
        if let Some(prefs) = &request.notification_preferences {
            ensure_preferences_object(prefs)?;
        }
        let changes = ProfileChanges {
            full_name: request.full_name.as_ref().map(|name| name.trim().to_string()),
            preferred_currency: request
                .preferred_currency
                .as_deref()
                .map(parse_currency_code)
                .transpose()?,
            notification_preferences: request.notification_preferences.clone(),
            onboarding_completed: None,
        };
        self.apply_profile_changes(user_id, &changes).await
    }

    #[instrument(skip(self))]
    pub async fn complete_onboarding(&self, user_id: &str) -> Result<Profile, AppError> {
        let profile = self
            .apply_profile_changes(user_id, &ProfileChanges::complete_onboarding())
            .await?;
        info!(user_id = %user_id, "Onboarding completed");
        Ok(profile)
    }

    async fn apply_profile_changes(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<Profile, AppError> {
        self.db
            .update_profile(user_id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))
    }
}
