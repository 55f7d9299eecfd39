//! Shared value types used across resources.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::error::ValidationError;

/// Represents a unique identifier for domain entities.
pub type EntityId = String;

/// Generates a new opaque identifier such as `txn_6f1c…`.
#[must_use]
pub fn new_id(prefix: &str) -> EntityId {
    format!("{}_{}", prefix, uuid::Uuid::new_v4())
}

/// Direction of money flow, shared by transactions and categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ValidationError::field(
                "type",
                format!("expected 'income' or 'expense', got '{}'", other),
            )),
        }
    }
}

/// Coerces a money amount to the fixed two-decimal representation.
#[must_use]
pub fn to_currency(amount: Decimal) -> Decimal {
    let mut value = amount.round_dp(2);
    value.rescale(2);
    value
}

/// Largest amount a `NUMERIC(12, 2)` column holds: 9999999999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rejects zero and negative amounts, naming the offending field.
pub fn ensure_positive(field: &str, amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::field(field, "must be greater than zero"));
    }
    within_max(field, to_currency(amount))
}

/// Rejects negative amounts, naming the offending field.
pub fn ensure_non_negative(field: &str, amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::field(field, "must not be negative"));
    }
    within_max(field, to_currency(amount))
}

fn within_max(field: &str, amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount > MAX_AMOUNT {
        return Err(ValidationError::amount_out_of_range(field));
    }
    Ok(amount)
}

/// Optional `month`/`year` query used by budgets and summaries.
///
/// Missing values default to the current UTC month.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// Month number, 1-12
    pub month: Option<i32>,
    /// Four digit year
    pub year: Option<i32>,
}

impl PeriodQuery {
    #[must_use]
    pub fn new(month: i32, year: i32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }

    /// Resolves the period against `now`, validating the month.
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<(i32, i32), ValidationError> {
        let month = self.month.unwrap_or(now.month() as i32);
        let year = self.year.unwrap_or(now.year());
        if !(1..=12).contains(&month) {
            return Err(ValidationError::field("month", "must be between 1 and 12"));
        }
        if !(1900..=9999).contains(&year) {
            return Err(ValidationError::field("year", "must be a four digit year"));
        }
        Ok((month, year))
    }

    pub fn resolve(&self) -> Result<(i32, i32), ValidationError> {
        self.resolve_at(Utc::now())
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub r#type: String,
    pub message: String,
}

/// Rate limit response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateLimitResponse {
    pub error: ErrorDetail,
    pub retry_after: u64,
}

/// Health check status for services.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub message: String,
    pub database: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database: HealthStatus) -> Self {
        let message = match database {
            HealthStatus::Healthy => "Personal Finance API is running",
            HealthStatus::Unhealthy => "Personal Finance API is running with an unavailable database",
        };
        Self {
            status: database,
            message: message.to_string(),
            database,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_id_has_prefix() {
        let id = new_id("txn");
        assert!(id.starts_with("txn_"));
        assert_ne!(new_id("txn"), id);
    }

    #[test]
    fn test_transaction_type_round_trip() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(TransactionType::Expense.to_string(), "expense");
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_transaction_type_serde() {
        let json = serde_json::to_string(&TransactionType::Income).unwrap();
        assert_eq!(json, "\"income\"");
        let parsed: TransactionType = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(parsed, TransactionType::Expense);
    }

    #[test]
    fn test_to_currency_rescales() {
        let amount: Decimal = "12.5".parse().unwrap();
        assert_eq!(to_currency(amount).to_string(), "12.50");

        let amount: Decimal = "3.14159".parse().unwrap();
        assert_eq!(to_currency(amount).to_string(), "3.14");
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("amount", Decimal::ZERO).is_err());
        assert!(ensure_positive("amount", Decimal::new(-100, 2)).is_err());
        assert_eq!(
            ensure_positive("amount", Decimal::new(1250, 2)).unwrap(),
            Decimal::new(1250, 2)
        );
    }

    #[test]
    fn test_ensure_positive_names_field() {
        let err = ensure_positive("target_amount", Decimal::ZERO).unwrap_err();
        assert!(err.to_string().contains("target_amount"));
    }

    #[test]
    fn test_ensure_non_negative_allows_zero() {
        assert_eq!(
            ensure_non_negative("current_amount", Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );
        assert!(ensure_non_negative("current_amount", Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_amounts_capped_at_column_precision() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
        assert_eq!(ensure_positive("amount", MAX_AMOUNT).unwrap(), MAX_AMOUNT);

        let err = ensure_positive("amount", Decimal::new(1_000_000_000_000, 0)).unwrap_err();
        assert!(err.to_string().contains("amount"));

        let err = ensure_non_negative("current_amount", MAX_AMOUNT + Decimal::ONE).unwrap_err();
        assert!(err.to_string().contains("current_amount"));
    }

    #[test]
    fn test_period_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let period = PeriodQuery::default();
        assert_eq!(period.resolve_at(now).unwrap(), (3, 2024));

        let period = PeriodQuery {
            month: Some(11),
            year: None,
        };
        assert_eq!(period.resolve_at(now).unwrap(), (11, 2024));
    }

    #[test]
    fn test_period_rejects_bad_month() {
        let err = PeriodQuery::new(13, 2024).resolve().unwrap_err();
        assert!(err.to_string().contains("month"));
    }

    #[test]
    fn test_health_response() {
        let response = HealthResponse::new(HealthStatus::Healthy);
        assert_eq!(response.status, HealthStatus::Healthy);

        let response = HealthResponse::new(HealthStatus::Unhealthy);
        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.database, HealthStatus::Unhealthy);
    }
}
