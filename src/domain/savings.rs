//! Savings goals and contributions toward them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::types::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SavingsGoal {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    #[schema(value_type = String, example = "1000.00")]
    pub target_amount: Decimal,
    #[schema(value_type = String, example = "250.00")]
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    /// `current_amount >= target_amount`, recomputed on every write
    pub is_achieved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Achievement rule shared by the service, the SQL statements and the mocks.
#[must_use]
pub fn is_goal_achieved(current_amount: Decimal, target_amount: Decimal) -> bool {
    current_amount >= target_amount
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSavingsGoalRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[schema(value_type = f64, example = 1000.0)]
    pub target_amount: Decimal,
    #[schema(value_type = Option<f64>)]
    pub current_amount: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSavingsGoalRequest {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub target_amount: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub current_amount: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributionRequest {
    #[schema(value_type = f64, example = 50.0)]
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewSavingsGoal {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub is_achieved: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SavingsGoalChanges {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

impl SavingsGoalChanges {
    /// Applies the changes to an existing goal, recomputing `is_achieved`.
    pub fn apply_to(&self, goal: &mut SavingsGoal) {
        if let Some(name) = &self.name {
            goal.name = name.clone();
        }
        if let Some(target) = self.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = self.current_amount {
            goal.current_amount = current;
        }
        if self.target_date.is_some() {
            goal.target_date = self.target_date;
        }
        goal.is_achieved = is_goal_achieved(goal.current_amount, goal.target_amount);
    }
}
