//! Monthly spending ceilings per category.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::CategorySummary;
use super::types::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Budget {
    pub id: EntityId,
    pub user_id: EntityId,
    pub category_id: EntityId,
    pub category: Option<CategorySummary>,
    #[schema(value_type = String, example = "400.00")]
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBudgetRequest {
    pub category_id: EntityId,
    #[schema(value_type = f64, example = 400.0)]
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateBudgetRequest {
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub id: EntityId,
    pub user_id: EntityId,
    pub category_id: EntityId,
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
}

/// One row of the `get_budget_status` aggregate, passed through untouched.
pub type BudgetStatusRow = serde_json::Value;
