//! Income and expense records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::category::CategorySummary;
use super::error::ValidationError;
use super::types::{EntityId, TransactionType};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Transaction {
    pub id: EntityId,
    pub user_id: EntityId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: Option<EntityId>,
    pub category: Option<CategorySummary>,
    #[schema(value_type = String, example = "12.50")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[schema(value_type = f64, example = 12.5)]
    pub amount: Decimal,
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
    pub category_id: Option<EntityId>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl CreateTransactionRequest {
    pub fn new(kind: TransactionType, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            date: None,
            category_id: None,
            description: None,
            is_recurring: false,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTransactionRequest {
    pub category_id: Option<EntityId>,
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id: EntityId,
    pub user_id: EntityId,
    pub kind: TransactionType,
    pub category_id: Option<EntityId>,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub category_id: Option<EntityId>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
}

/// Query string accepted by the transaction listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    pub category_id: Option<EntityId>,
    /// `income` or `expense`
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub end_date: Option<NaiveDate>,
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size, 1-100
    pub limit: Option<i64>,
}

/// Validated listing filter handed to the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category_id: Option<EntityId>,
    pub kind: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `None` returns every matching row.
    pub limit: Option<i64>,
    pub offset: i64,
}

impl TransactionFilter {
    #[must_use]
    pub fn of_kind(kind: TransactionType) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Whether a transaction passes every filter except paging.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self
                .category_id
                .as_ref()
                .is_none_or(|id| transaction.category_id.as_ref() == Some(id))
            && self.start_date.is_none_or(|start| transaction.date >= start)
            && self.end_date.is_none_or(|end| transaction.date <= end)
    }
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = ValidationError;

    fn try_from(query: TransactionQuery) -> Result<Self, Self::Error> {
        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(ValidationError::field("page", "must be 1 or greater"));
        }
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ValidationError::field(
                "limit",
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(ValidationError::field(
                    "start_date",
                    "must not be after end_date",
                ));
            }
        }
        Ok(Self {
            category_id: query.category_id,
            kind: query.kind,
            start_date: query.start_date,
            end_date: query.end_date,
            limit: Some(limit),
            offset: (page - 1) * limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(kind: TransactionType, category_id: Option<&str>, on: NaiveDate) -> Transaction {
        Transaction {
            id: "txn_1".to_string(),
            user_id: "usr_1".to_string(),
            kind,
            category_id: category_id.map(str::to_string),
            category: None,
            amount: Decimal::new(1250, 2),
            description: None,
            date: on,
            is_recurring: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_defaults() {
        let filter = TransactionFilter::try_from(TransactionQuery::default()).unwrap();
        assert_eq!(filter.limit, Some(DEFAULT_PAGE_SIZE));
        assert_eq!(filter.offset, 0);
        assert_eq!(TransactionFilter::default().limit, None);
    }

    #[test]
    fn test_filter_paging() {
        let query = TransactionQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        let filter = TransactionFilter::try_from(query).unwrap();
        assert_eq!(filter.limit, Some(20));
        assert_eq!(filter.offset, 40);
    }

    #[test]
    fn test_filter_rejects_out_of_range_paging() {
        let query = TransactionQuery {
            page: Some(0),
            ..Default::default()
        };
        let err = TransactionFilter::try_from(query).unwrap_err();
        assert!(err.to_string().contains("page"));

        let query = TransactionQuery {
            limit: Some(101),
            ..Default::default()
        };
        let err = TransactionFilter::try_from(query).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_filter_rejects_inverted_range() {
        let query = TransactionQuery {
            start_date: Some(date(2024, 2, 1)),
            end_date: Some(date(2024, 1, 1)),
            ..Default::default()
        };
        assert!(TransactionFilter::try_from(query).is_err());
    }

    #[test]
    fn test_filter_matches() {
        let expense = transaction(TransactionType::Expense, Some("cat_a"), date(2024, 1, 15));

        assert!(TransactionFilter::default().matches(&expense));
        assert!(TransactionFilter::of_kind(TransactionType::Expense).matches(&expense));
        assert!(!TransactionFilter::of_kind(TransactionType::Income).matches(&expense));

        let by_category = TransactionFilter {
            category_id: Some("cat_b".to_string()),
            ..Default::default()
        };
        assert!(!by_category.matches(&expense));

        let in_range = TransactionFilter {
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 31)),
            ..Default::default()
        };
        assert!(in_range.matches(&expense));

        let after = TransactionFilter {
            start_date: Some(date(2024, 2, 1)),
            ..Default::default()
        };
        assert!(!after.matches(&expense));
    }

    #[test]
    fn test_create_request_accepts_numeric_amount() {
        let request: CreateTransactionRequest = serde_json::from_str(
            r#"{"type":"expense","category_id":"c1","amount":12.50,"date":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, TransactionType::Expense);
        assert_eq!(request.amount, Decimal::new(1250, 2));
        assert_eq!(request.date, Some(date(2024, 1, 1)));
        assert!(!request.is_recurring);
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let json = serde_json::to_value(transaction(
            TransactionType::Income,
            None,
            date(2024, 1, 1),
        ))
        .unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["date"], "2024-01-01");
    }
}
