//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases. The database mock follows the same
//! ownership, ordering and constraint rules as the Postgres schema.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;

use crate::domain::{
    AdvisorClient, AppError, BankClient, Budget, BudgetRepository, BudgetStatusRow, Category,
    CategoryChanges, CategoryRepository, CategorySummary, DatabaseClient, DatabaseError,
    ExchangeRateClient, ExternalServiceError, NewBudget, NewCategory, NewSavingsGoal,
    NewTransaction, NewUser, Profile, ProfileChanges, ProfileRepository, RateTable, SavingsGoal,
    SavingsGoalChanges, SavingsGoalRepository, Transaction, TransactionChanges, TransactionFilter,
    TransactionRepository, TransactionType, User, UserChanges, UserRepository, ValidationError,
    MAX_AMOUNT, is_goal_achieved, to_currency,
};

/// Seeded default income category.
pub const SALARY_CATEGORY_ID: &str = "cat_default_salary";
/// Seeded default expense category.
pub const GROCERIES_CATEGORY_ID: &str = "cat_default_groceries";

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(ms) = self.latency_ms {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
    }
}

fn as_number(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[derive(Default)]
struct MockStore {
    users: Vec<User>,
    profiles: HashMap<String, Profile>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<SavingsGoal>,
}

impl MockStore {
    fn seeded() -> Self {
        let now = Utc::now();
        let default = |id: &str, name: &str, kind, color: &str| Category {
            id: id.to_string(),
            user_id: None,
            name: name.to_string(),
            kind,
            color: color.to_string(),
            is_default: true,
            created_at: now,
        };
        Self {
            categories: vec![
                default(SALARY_CATEGORY_ID, "Salary", TransactionType::Income, "#10b981"),
                default(
                    GROCERIES_CATEGORY_ID,
                    "Groceries",
                    TransactionType::Expense,
                    "#f59e0b",
                ),
            ],
            ..Default::default()
        }
    }

    fn visible_category(&self, user_id: &str, id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id && c.is_visible_to(user_id))
    }

    fn summary(&self, id: Option<&str>) -> Option<CategorySummary> {
        let id = id?;
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(CategorySummary::from)
    }
}

/// In-memory database client for testing.
///
/// # Example
///
/// ```
/// use finance_api::test_utils::{MockDatabaseClient, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockDatabaseClient::new();
///
/// // Create a mock that fails
/// let failing_mock = MockDatabaseClient::with_config(MockConfig::failure("DB error"));
/// ```
pub struct MockDatabaseClient {
    store: Mutex<MockStore>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            store: Mutex::new(MockStore::seeded()),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    pub fn user_count(&self) -> usize {
        self.store.lock().unwrap().users.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.store.lock().unwrap().transactions.len()
    }

    async fn enter(&self) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.config.simulate_latency().await;
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockDatabaseClient {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        let mut users = store.users.clone();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn create_user(&self, data: &NewUser) -> Result<User, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        if store.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::Database(DatabaseError::Duplicate(
                "users_email_key".to_string(),
            )));
        }

        let now = Utc::now();
        let user = User {
            id: data.id.clone(),
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        store.users.push(user.clone());
        store
            .profiles
            .insert(user.id.clone(), Profile::initial(&user.id, &user.name));
        Ok(user)
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<Option<User>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        if let Some(email) = &changes.email {
            if store.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(AppError::Database(DatabaseError::Duplicate(
                    "users_email_key".to_string(),
                )));
            }
        }
        let Some(user) = store.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl TransactionRepository for MockDatabaseClient {
    async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        // Newest insert first, so the stable sort breaks date ties by creation.
        let mut rows: Vec<Transaction> = store
            .transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));

        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = filter
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn create_transaction(&self, data: &NewTransaction) -> Result<Transaction, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        if let Some(category_id) = &data.category_id {
            if !store.categories.iter().any(|c| &c.id == category_id) {
                return Err(AppError::Database(DatabaseError::ForeignKey(
                    "transactions_category_id_fkey".to_string(),
                )));
            }
        }

        let transaction = Transaction {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            kind: data.kind,
            category_id: data.category_id.clone(),
            category: store.summary(data.category_id.as_deref()),
            amount: to_currency(data.amount),
            description: data.description.clone(),
            date: data.date,
            is_recurring: data.is_recurring,
            created_at: Utc::now(),
        };
        store.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        changes: &TransactionChanges,
    ) -> Result<Option<Transaction>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let summary = store.summary(changes.category_id.as_deref());
        let Some(transaction) = store
            .transactions
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(category_id) = &changes.category_id {
            transaction.category_id = Some(category_id.clone());
            transaction.category = summary;
        }
        if let Some(amount) = changes.amount {
            transaction.amount = to_currency(amount);
        }
        if let Some(description) = &changes.description {
            transaction.description = Some(description.clone());
        }
        if let Some(date) = changes.date {
            transaction.date = date;
        }
        if let Some(recurring) = changes.is_recurring {
            transaction.is_recurring = recurring;
        }
        Ok(Some(transaction.clone()))
    }

    async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let before = store.transactions.len();
        store
            .transactions
            .retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(store.transactions.len() < before)
    }

    async fn monthly_summary(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        let in_month: Vec<&Transaction> = store
            .transactions
            .iter()
            .filter(|t| {
                t.user_id == user_id && t.date.year() == year && t.date.month() as i32 == month
            })
            .collect();
        let total = |kind: TransactionType| -> Decimal {
            in_month
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount)
                .sum()
        };
        let income = total(TransactionType::Income);
        let expense = total(TransactionType::Expense);
        Ok(vec![json!({
            "month": month,
            "year": year,
            "total_income": as_number(income),
            "total_expense": as_number(expense),
            "net_balance": as_number(income - expense),
            "transaction_count": in_month.len(),
        })])
    }
}

#[async_trait]
impl CategoryRepository for MockDatabaseClient {
    async fn list_categories(
        &self,
        user_id: &str,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        let mut rows: Vec<Category> = store
            .categories
            .iter()
            .filter(|c| c.is_visible_to(user_id) && kind.is_none_or(|k| c.kind == k))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.is_default.cmp(&a.is_default).then(a.name.cmp(&b.name)));
        Ok(rows)
    }

    async fn find_category(&self, user_id: &str, id: &str) -> Result<Option<Category>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        Ok(store.visible_category(user_id, id).cloned())
    }

    async fn create_category(&self, data: &NewCategory) -> Result<Category, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let category = Category {
            id: data.id.clone(),
            user_id: Some(data.user_id.clone()),
            name: data.name.clone(),
            kind: data.kind,
            color: data.color.clone(),
            is_default: false,
            created_at: Utc::now(),
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        user_id: &str,
        id: &str,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let Some(category) = store
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id.as_deref() == Some(user_id))
        else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            category.name = name.clone();
        }
        if let Some(color) = &changes.color {
            category.color = color.clone();
        }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let owned = store
            .categories
            .iter()
            .any(|c| c.id == id && c.user_id.as_deref() == Some(user_id));
        if !owned {
            return Ok(false);
        }
        if store
            .transactions
            .iter()
            .any(|t| t.category_id.as_deref() == Some(id))
        {
            return Err(AppError::Database(DatabaseError::ForeignKey(
                "transactions_category_id_fkey".to_string(),
            )));
        }
        store.categories.retain(|c| c.id != id);
        store.budgets.retain(|b| b.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl BudgetRepository for MockDatabaseClient {
    async fn list_budgets(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<Budget>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        Ok(store
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && b.month == month && b.year == year)
            .cloned()
            .collect())
    }

    async fn budget_status(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<BudgetStatusRow>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        let rows = store
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && b.month == month && b.year == year)
            .map(|budget| {
                let spent: Decimal = store
                    .transactions
                    .iter()
                    .filter(|t| {
                        t.user_id == user_id
                            && t.kind == TransactionType::Expense
                            && t.category_id.as_deref() == Some(budget.category_id.as_str())
                            && t.date.year() == year
                            && t.date.month() as i32 == month
                    })
                    .map(|t| t.amount)
                    .sum();
                let percentage = if budget.amount.is_zero() {
                    Decimal::ZERO
                } else {
                    (spent * Decimal::ONE_HUNDRED / budget.amount).round_dp(2)
                };
                json!({
                    "budget_id": budget.id,
                    "category_id": budget.category_id,
                    "category_name": budget.category.as_ref().map(|c| c.name.clone()),
                    "budget_amount": as_number(budget.amount),
                    "spent_amount": as_number(spent),
                    "remaining_amount": as_number(budget.amount - spent),
                    "percentage_used": as_number(percentage),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn create_budget(&self, data: &NewBudget) -> Result<Budget, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let duplicate = store.budgets.iter().any(|b| {
            b.user_id == data.user_id
                && b.category_id == data.category_id
                && b.month == data.month
                && b.year == data.year
        });
        if duplicate {
            return Err(AppError::Database(DatabaseError::Duplicate(
                "budgets_user_category_period_key".to_string(),
            )));
        }

        let now = Utc::now();
        let budget = Budget {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            category_id: data.category_id.clone(),
            category: store.summary(Some(&data.category_id)),
            amount: to_currency(data.amount),
            month: data.month,
            year: data.year,
            created_at: now,
            updated_at: now,
        };
        store.budgets.push(budget.clone());
        Ok(budget)
    }

    async fn update_budget(
        &self,
        user_id: &str,
        id: &str,
        amount: Decimal,
    ) -> Result<Option<Budget>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let Some(budget) = store
            .budgets
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
        else {
            return Ok(None);
        };
        budget.amount = to_currency(amount);
        budget.updated_at = Utc::now();
        Ok(Some(budget.clone()))
    }

    async fn delete_budget(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let before = store.budgets.len();
        store.budgets.retain(|b| !(b.id == id && b.user_id == user_id));
        Ok(store.budgets.len() < before)
    }
}

#[async_trait]
impl SavingsGoalRepository for MockDatabaseClient {
    async fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        Ok(store
            .goals
            .iter()
            .rev()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_savings_goal(&self, data: &NewSavingsGoal) -> Result<SavingsGoal, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let now = Utc::now();
        let goal = SavingsGoal {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            name: data.name.clone(),
            target_amount: to_currency(data.target_amount),
            current_amount: to_currency(data.current_amount),
            target_date: data.target_date,
            is_achieved: is_goal_achieved(data.current_amount, data.target_amount),
            created_at: now,
            updated_at: now,
        };
        store.goals.push(goal.clone());
        Ok(goal)
    }

    async fn update_savings_goal(
        &self,
        user_id: &str,
        id: &str,
        changes: &SavingsGoalChanges,
    ) -> Result<Option<SavingsGoal>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let Some(goal) = store
            .goals
            .iter_mut()
            .find(|g| g.id == id && g.user_id == user_id)
        else {
            return Ok(None);
        };
        changes.apply_to(goal);
        goal.target_amount = to_currency(goal.target_amount);
        goal.current_amount = to_currency(goal.current_amount);
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }

    async fn add_contribution(
        &self,
        user_id: &str,
        id: &str,
        amount: Decimal,
    ) -> Result<Option<SavingsGoal>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let Some(goal) = store
            .goals
            .iter_mut()
            .find(|g| g.id == id && g.user_id == user_id)
        else {
            return Ok(None);
        };
        let total = to_currency(goal.current_amount + amount);
        if total > MAX_AMOUNT {
            return Err(AppError::Validation(ValidationError::amount_out_of_range(
                "amount",
            )));
        }
        goal.current_amount = total;
        goal.is_achieved = is_goal_achieved(goal.current_amount, goal.target_amount);
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }

    async fn delete_savings_goal(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let before = store.goals.len();
        store.goals.retain(|g| !(g.id == id && g.user_id == user_id));
        Ok(store.goals.len() < before)
    }
}

#[async_trait]
impl ProfileRepository for MockDatabaseClient {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.enter().await?;
        let store = self.store.lock().unwrap();
        Ok(store.profiles.get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, AppError> {
        self.enter().await?;
        let mut store = self.store.lock().unwrap();
        let Some(profile) = store.profiles.get_mut(user_id) else {
            return Ok(None);
        };
        changes.apply_to(profile);
        Ok(Some(profile.clone()))
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }

        if self.config.should_fail {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database error".to_string(),
            )));
        }
        Ok(())
    }
}

/// Shared failure switch and call counter for the third-party mocks.
#[derive(Default)]
struct MockUpstream {
    failing: AtomicBool,
    call_count: AtomicU64,
}

impl MockUpstream {
    fn enter(&self, service: &str) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(AppError::ExternalService(ExternalServiceError::Unavailable(
                format!("{} mock unavailable", service),
            )));
        }
        Ok(())
    }
}

/// Mock bank feed returning one canned transaction per call.
#[derive(Default)]
pub struct MockBankClient {
    upstream: MockUpstream,
}

impl MockBankClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.upstream.failing.store(failing, Ordering::Relaxed);
    }

    pub fn call_count(&self) -> u64 {
        self.upstream.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BankClient for MockBankClient {
    async fn fetch_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.upstream.enter("bank")?;
        Ok(vec![json!({
            "id": "1",
            "user_id": user_id,
            "amount": "42.00",
            "description": "Corner cafe",
            "type": "expense",
        })])
    }
}

/// Mock rate table with a handful of currencies.
pub struct MockExchangeRateClient {
    rates: RateTable,
    upstream: MockUpstream,
}

impl MockExchangeRateClient {
    #[must_use]
    pub fn new() -> Self {
        let rates = [("USD", 1.0), ("EUR", 0.92), ("GBP", 0.79), ("RON", 4.57)]
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect();
        Self::with_rates(rates)
    }

    #[must_use]
    pub fn with_rates(rates: RateTable) -> Self {
        Self {
            rates,
            upstream: MockUpstream::default(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.upstream.failing.store(failing, Ordering::Relaxed);
    }

    pub fn call_count(&self) -> u64 {
        self.upstream.call_count.load(Ordering::Relaxed)
    }
}

impl Default for MockExchangeRateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeRateClient for MockExchangeRateClient {
    async fn latest_rates(&self) -> Result<RateTable, AppError> {
        self.upstream.enter("exchange rate")?;
        Ok(self.rates.clone())
    }
}

/// Mock advisor that records prompts and replies with fixed text.
pub struct MockAdvisorClient {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
    upstream: MockUpstream,
}

impl MockAdvisorClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_reply(
            "Here are 4 tips for you:\n\n1. Groceries are not a hobby.\n2. Cook once, eat twice.\n\
             3. Your wallet called, it misses you.\n4. Round up and save the change.\n",
        )
    }

    #[must_use]
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Arc::new(Mutex::new(Vec::new())),
            upstream: MockUpstream::default(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.upstream.failing.store(failing, Ordering::Relaxed);
    }

    pub fn call_count(&self) -> u64 {
        self.upstream.call_count.load(Ordering::Relaxed)
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockAdvisorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdvisorClient for MockAdvisorClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        self.upstream.enter("advisor")?;
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_mock_reports_query_error() {
        let mock = MockDatabaseClient::failing("boom");
        let result = mock.list_users().await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::Query(msg))) if msg == "boom"
        ));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_seeds_default_categories() {
        let mock = MockDatabaseClient::new();
        let categories = mock.list_categories("usr_any", None).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.is_default));
    }

    #[tokio::test]
    async fn test_mock_latency() {
        let mock = MockDatabaseClient::with_config(MockConfig::success().with_latency(5));
        let start = std::time::Instant::now();
        mock.list_users().await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_external_mocks_fail_on_demand() {
        let bank = MockBankClient::new();
        bank.set_failing(true);
        assert!(matches!(
            bank.fetch_transactions("usr_1").await,
            Err(AppError::ExternalService(_))
        ));
        assert_eq!(bank.call_count(), 1);

        let advisor = MockAdvisorClient::with_reply("one\ntwo");
        assert_eq!(advisor.generate("hi").await.unwrap(), "one\ntwo");
        assert_eq!(advisor.prompts(), vec!["hi".to_string()]);
    }
}
