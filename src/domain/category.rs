//! Transaction categories: seeded defaults plus per-user additions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::error::ValidationError;
use super::types::{EntityId, TransactionType};

/// Color assigned when a category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Category {
    pub id: EntityId,
    /// `None` for the shared default categories.
    pub user_id: Option<EntityId>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub color: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Whether `user_id` may reference this category.
    #[must_use]
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.is_default || self.user_id.as_deref() == Some(user_id)
    }
}

/// Reference data joined onto transactions and budgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CategorySummary {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub color: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            kind: category.kind,
            color: category.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Restrict to `income` or `expense` categories
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub kind: TransactionType,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Accepts `#RRGGBB` colors and returns them lowercased.
pub fn parse_color(color: &str) -> Result<String, ValidationError> {
    let hex = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    match hex {
        Some(hex) => Ok(format!("#{}", hex.to_ascii_lowercase())),
        None => Err(ValidationError::field(
            "color",
            "must be a hex color such as #6366f1",
        )),
    }
}
