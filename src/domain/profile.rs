//! Per-user preferences, one row per account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::ValidationError;
use super::types::EntityId;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Profile {
    /// Same as the owning user's id.
    pub id: EntityId,
    pub full_name: Option<String>,
    pub preferred_currency: String,
    #[schema(value_type = Object)]
    pub notification_preferences: serde_json::Value,
    pub onboarding_completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The row inserted alongside a new user.
    #[must_use]
    pub fn initial(user_id: &str, full_name: &str) -> Self {
        Self {
            id: user_id.to_string(),
            full_name: Some(full_name.to_string()),
            preferred_currency: DEFAULT_CURRENCY.to_string(),
            notification_preferences: serde_json::json!({}),
            onboarding_completed: false,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Full name is too long"))]
    pub full_name: Option<String>,
    pub preferred_currency: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub notification_preferences: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub preferred_currency: Option<String>,
    pub notification_preferences: Option<serde_json::Value>,
    pub onboarding_completed: Option<bool>,
}

impl ProfileChanges {
    #[must_use]
    pub fn complete_onboarding() -> Self {
        Self {
            onboarding_completed: Some(true),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.full_name {
            profile.full_name = Some(name.clone());
        }
        if let Some(currency) = &self.preferred_currency {
            profile.preferred_currency = currency.clone();
        }
        if let Some(prefs) = &self.notification_preferences {
            profile.notification_preferences = prefs.clone();
        }
        if let Some(done) = self.onboarding_completed {
            profile.onboarding_completed = done;
        }
        profile.updated_at = Utc::now();
    }
}

/// Accepts three-letter ISO-4217 style codes and returns them uppercased.
pub fn parse_currency_code(code: &str) -> Result<String, ValidationError> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ValidationError::field(
            "preferred_currency",
            "must be a three letter currency code",
        ))
    }
}

/// Notification preferences must be a JSON object.
pub fn ensure_preferences_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ValidationError::field(
            "notification_preferences",
            "must be a JSON object",
        ))
    }
}
