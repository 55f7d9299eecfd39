//! Domain traits defining contracts for persistence and third-party services.
//!
//! Every repository method that reads or writes user data takes the verified
//! owner id, and implementations filter on it in the same statement.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::budget::{Budget, BudgetStatusRow, NewBudget};
use super::category::{Category, CategoryChanges, NewCategory};
use super::error::AppError;
use super::external::RateTable;
use super::profile::{Profile, ProfileChanges};
use super::savings::{NewSavingsGoal, SavingsGoal, SavingsGoalChanges};
use super::transaction::{NewTransaction, Transaction, TransactionChanges, TransactionFilter};
use super::types::TransactionType;
use super::user::{NewUser, User, UserChanges};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Lookup by normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Inserts the user and its default profile together.
    ///
    /// A taken email surfaces as `DatabaseError::Duplicate`.
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError>;

    async fn update_user(&self, id: &str, changes: &UserChanges)
    -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Ordered by `date` then `created_at`, newest first.
    async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError>;

    async fn create_transaction(&self, data: &NewTransaction) -> Result<Transaction, AppError>;

    /// Returns `None` when no row matches both `id` and `user_id`.
    async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        changes: &TransactionChanges,
    ) -> Result<Option<Transaction>, AppError>;

    /// Returns `false` when no row matches both `id` and `user_id`.
    async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<bool, AppError>;

    /// Rows of the `get_monthly_summary` aggregate.
    async fn monthly_summary(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<serde_json::Value>, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Defaults first, then by name.
    async fn list_categories(
        &self,
        user_id: &str,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError>;

    /// A category visible to `user_id`: one of theirs or a default.
    async fn find_category(&self, user_id: &str, id: &str) -> Result<Option<Category>, AppError>;

    async fn create_category(&self, data: &NewCategory) -> Result<Category, AppError>;

    /// Only the caller's own categories are updatable.
    async fn update_category(
        &self,
        user_id: &str,
        id: &str,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, AppError>;

    /// A category still referenced by transactions surfaces as
    /// `DatabaseError::ForeignKey`.
    async fn delete_category(&self, user_id: &str, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn list_budgets(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<Budget>, AppError>;

    /// Rows of the `get_budget_status` aggregate.
    async fn budget_status(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<BudgetStatusRow>, AppError>;

    async fn create_budget(&self, data: &NewBudget) -> Result<Budget, AppError>;

    async fn update_budget(
        &self,
        user_id: &str,
        id: &str,
        amount: Decimal,
    ) -> Result<Option<Budget>, AppError>;

    async fn delete_budget(&self, user_id: &str, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SavingsGoalRepository: Send + Sync {
    /// Newest first.
    async fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>, AppError>;

    async fn create_savings_goal(&self, data: &NewSavingsGoal) -> Result<SavingsGoal, AppError>;

    /// Recomputes `is_achieved` in the same write.
    async fn update_savings_goal(
        &self,
        user_id: &str,
        id: &str,
        changes: &SavingsGoalChanges,
    ) -> Result<Option<SavingsGoal>, AppError>;

    /// Atomically adds `amount` to `current_amount` and recomputes `is_achieved`.
    async fn add_contribution(
        &self,
        user_id: &str,
        id: &str,
        amount: Decimal,
    ) -> Result<Option<SavingsGoal>, AppError>;

    async fn delete_savings_goal(&self, user_id: &str, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError>;

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, AppError>;
}

/// Database client trait bundling every repository behind one handle.
#[async_trait]
pub trait DatabaseClient:
    UserRepository
    + TransactionRepository
    + CategoryRepository
    + BudgetRepository
    + SavingsGoalRepository
    + ProfileRepository
    + Send
    + Sync
{
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Mock bank feed keyed by user id.
#[async_trait]
pub trait BankClient: Send + Sync {
    async fn fetch_transactions(&self, user_id: &str)
    -> Result<Vec<serde_json::Value>, AppError>;
}

/// Exchange-rate provider with a USD base.
#[async_trait]
pub trait ExchangeRateClient: Send + Sync {
    async fn latest_rates(&self) -> Result<RateTable, AppError>;
}

/// Generative text model used for spending tips.
#[async_trait]
pub trait AdvisorClient: Send + Sync {
    /// Returns the model's raw text reply for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}
