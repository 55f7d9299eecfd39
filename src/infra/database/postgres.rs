//! PostgreSQL database client implementation.
//!
//! Every statement that touches user data filters on the owner id, and every
//! write is a single statement. Joined category data is read back in the same
//! round trip through a CTE over the written row.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{info, instrument};

use crate::domain::{
    AppError, Budget, BudgetRepository, BudgetStatusRow, Category, CategoryChanges,
    CategoryRepository, CategorySummary, DatabaseClient, DatabaseError, NewBudget, NewCategory,
    NewSavingsGoal, NewTransaction, NewUser, Profile, ProfileChanges, ProfileRepository,
    SavingsGoal, SavingsGoalChanges, SavingsGoalRepository, Transaction, TransactionChanges,
    TransactionFilter, TransactionRepository, TransactionType, User, UserChanges,
    UserRepository,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

const CATEGORY_COLUMNS: &str = "id, user_id, name, type, color, is_default, created_at";

const TRANSACTION_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.type, t.category_id, t.amount, t.description, t.date,
           t.is_recurring, t.created_at,
           c.name AS category_name, c.type AS category_type, c.color AS category_color
"#;

const BUDGET_SELECT: &str = r#"
    SELECT b.id, b.user_id, b.category_id, b.amount, b.month, b.year,
           b.created_at, b.updated_at,
           c.name AS category_name, c.type AS category_type, c.color AS category_color
"#;

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, current_amount, target_date, \
                            is_achieved, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, full_name, preferred_currency, notification_preferences, \
                               onboarding_completed, updated_at";

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client with default configuration
    pub async fn with_defaults(database_url: &str) -> Result<Self, AppError> {
        Self::new(database_url, PostgresConfig::default()).await
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs an aggregate function and returns each row as a JSON object.
    async fn aggregate_rows(
        &self,
        function: &str,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let sql = format!("SELECT to_jsonb(s) AS data FROM {}($1, $2, $3) s", function);
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(month)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<serde_json::Value, _>("data").map_err(AppError::from))
            .collect()
    }
}

fn parse_kind(row: &PgRow, column: &str) -> Result<TransactionType, AppError> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|_| {
        AppError::Database(DatabaseError::Query(format!(
            "unexpected {} value '{}'",
            column, raw
        )))
    })
}

/// Reads the `category_*` columns of a LEFT JOIN.
fn joined_category(row: &PgRow, id_column: &str) -> Result<Option<CategorySummary>, AppError> {
    let id: Option<String> = row.try_get(id_column)?;
    let name: Option<String> = row.try_get("category_name")?;
    match (id, name) {
        (Some(id), Some(name)) => Ok(Some(CategorySummary {
            id,
            name,
            kind: parse_kind(row, "category_type")?,
            color: row.try_get("category_color")?,
        })),
        _ => Ok(None),
    }
}

fn row_to_user(row: &PgRow) -> Result<User, AppError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_category(row: &PgRow) -> Result<Category, AppError> {
    Ok(Category {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        kind: parse_kind(row, "type")?,
        color: row.try_get("color")?,
        is_default: row.try_get("is_default")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_transaction(row: &PgRow) -> Result<Transaction, AppError> {
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: parse_kind(row, "type")?,
        category_id: row.try_get("category_id")?,
        category: joined_category(row, "category_id")?,
        amount: row.try_get("amount")?,
        description: row.try_get("description")?,
        date: row.try_get("date")?,
        is_recurring: row.try_get("is_recurring")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_budget(row: &PgRow) -> Result<Budget, AppError> {
    Ok(Budget {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        category_id: row.try_get("category_id")?,
        category: joined_category(row, "category_id")?,
        amount: row.try_get("amount")?,
        month: row.try_get("month")?,
        year: row.try_get("year")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_goal(row: &PgRow) -> Result<SavingsGoal, AppError> {
    Ok(SavingsGoal {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        target_amount: row.try_get("target_amount")?,
        current_amount: row.try_get("current_amount")?,
        target_date: row.try_get("target_date")?,
        is_achieved: row.try_get("is_achieved")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_profile(row: &PgRow) -> Result<Profile, AppError> {
    Ok(Profile {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        preferred_currency: row.try_get("preferred_currency")?,
        notification_preferences: row.try_get("notification_preferences")?,
        onboarding_completed: row.try_get("onboarding_completed")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_user).collect()
    }

    #[instrument(skip(self, data), fields(user_id = %data.id))]
    async fn create_user(&self, data: &NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            WITH new_user AS (
                INSERT INTO users (id, name, email, password_hash)
                VALUES ($1, $2, $3, $4)
                RETURNING {columns}
            ), new_profile AS (
                INSERT INTO profiles (id, full_name)
                SELECT id, name FROM new_user
            )
            SELECT {columns} FROM new_user
            "#,
            columns = USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.name)
            .bind(&data.email)
            .bind(&data.password_hash)
            .fetch_one(&self.pool)
            .await?;
        row_to_user(&row)
    }

    #[instrument(skip(self, changes))]
    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl TransactionRepository for PostgresClient {
    #[instrument(skip(self, filter))]
    async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let sql = format!(
            r#"
            {select}
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = $1
              AND ($2::TEXT IS NULL OR t.type = $2)
              AND ($3::TEXT IS NULL OR t.category_id = $3)
              AND ($4::DATE IS NULL OR t.date >= $4)
              AND ($5::DATE IS NULL OR t.date <= $5)
            ORDER BY t.date DESC, t.created_at DESC
            LIMIT $6 OFFSET $7
            "#,
            select = TRANSACTION_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(filter.kind.map(|kind| kind.as_str()))
            .bind(&filter.category_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_transaction).collect()
    }

    #[instrument(skip(self, data), fields(transaction_id = %data.id))]
    async fn create_transaction(&self, data: &NewTransaction) -> Result<Transaction, AppError> {
        let sql = format!(
            r#"
            WITH t AS (
                INSERT INTO transactions
                    (id, user_id, type, category_id, amount, description, date, is_recurring)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            {select}
            FROM t
            LEFT JOIN categories c ON c.id = t.category_id
            "#,
            select = TRANSACTION_SELECT
        );
        let row = sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.user_id)
            .bind(data.kind.as_str())
            .bind(&data.category_id)
            .bind(data.amount)
            .bind(&data.description)
            .bind(data.date)
            .bind(data.is_recurring)
            .fetch_one(&self.pool)
            .await?;
        row_to_transaction(&row)
    }

    #[instrument(skip(self, changes))]
    async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        changes: &TransactionChanges,
    ) -> Result<Option<Transaction>, AppError> {
        let sql = format!(
            r#"
            WITH t AS (
                UPDATE transactions SET
                    category_id = COALESCE($3, category_id),
                    amount = COALESCE($4, amount),
                    description = COALESCE($5, description),
                    date = COALESCE($6, date),
                    is_recurring = COALESCE($7, is_recurring)
                WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            {select}
            FROM t
            LEFT JOIN categories c ON c.id = t.category_id
            "#,
            select = TRANSACTION_SELECT
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&changes.category_id)
            .bind(changes.amount)
            .bind(&changes.description)
            .bind(changes.date)
            .bind(changes.is_recurring)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_transaction).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn monthly_summary(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.aggregate_rows("get_monthly_summary", user_id, month, year)
            .await
    }
}

#[async_trait]
impl CategoryRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn list_categories(
        &self,
        user_id: &str,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError> {
        let sql = format!(
            r#"
            SELECT {} FROM categories
            WHERE (user_id = $1 OR is_default)
              AND ($2::TEXT IS NULL OR type = $2)
            ORDER BY is_default DESC, name ASC
            "#,
            CATEGORY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(kind.map(|kind| kind.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_category).collect()
    }

    #[instrument(skip(self))]
    async fn find_category(&self, user_id: &str, id: &str) -> Result<Option<Category>, AppError> {
        let sql = format!(
            "SELECT {} FROM categories WHERE id = $1 AND (user_id = $2 OR is_default)",
            CATEGORY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    #[instrument(skip(self, data), fields(category_id = %data.id))]
    async fn create_category(&self, data: &NewCategory) -> Result<Category, AppError> {
        let sql = format!(
            r#"
            INSERT INTO categories (id, user_id, name, type, color, is_default)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.user_id)
            .bind(&data.name)
            .bind(data.kind.as_str())
            .bind(&data.color)
            .fetch_one(&self.pool)
            .await?;
        row_to_category(&row)
    }

    #[instrument(skip(self, changes))]
    async fn update_category(
        &self,
        user_id: &str,
        id: &str,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, AppError> {
        let sql = format!(
            r#"
            UPDATE categories SET
                name = COALESCE($3, name),
                color = COALESCE($4, color)
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&changes.name)
            .bind(&changes.color)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BudgetRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn list_budgets(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<Budget>, AppError> {
        let sql = format!(
            r#"
            {select}
            FROM budgets b
            JOIN categories c ON c.id = b.category_id
            WHERE b.user_id = $1 AND b.month = $2 AND b.year = $3
            ORDER BY c.name ASC
            "#,
            select = BUDGET_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(month)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_budget).collect()
    }

    #[instrument(skip(self))]
    async fn budget_status(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> Result<Vec<BudgetStatusRow>, AppError> {
        self.aggregate_rows("get_budget_status", user_id, month, year)
            .await
    }

    #[instrument(skip(self, data), fields(budget_id = %data.id))]
    async fn create_budget(&self, data: &NewBudget) -> Result<Budget, AppError> {
        let sql = format!(
            r#"
            WITH b AS (
                INSERT INTO budgets (id, user_id, category_id, amount, month, year)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            {select}
            FROM b
            JOIN categories c ON c.id = b.category_id
            "#,
            select = BUDGET_SELECT
        );
        let row = sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.user_id)
            .bind(&data.category_id)
            .bind(data.amount)
            .bind(data.month)
            .bind(data.year)
            .fetch_one(&self.pool)
            .await?;
        row_to_budget(&row)
    }

    #[instrument(skip(self))]
    async fn update_budget(
        &self,
        user_id: &str,
        id: &str,
        amount: Decimal,
    ) -> Result<Option<Budget>, AppError> {
        let sql = format!(
            r#"
            WITH b AS (
                UPDATE budgets SET amount = $3, updated_at = NOW()
                WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            {select}
            FROM b
            JOIN categories c ON c.id = b.category_id
            "#,
            select = BUDGET_SELECT
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_budget).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_budget(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SavingsGoalRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>, AppError> {
        let sql = format!(
            "SELECT {} FROM savings_goals WHERE user_id = $1 ORDER BY created_at DESC",
            GOAL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_goal).collect()
    }

    #[instrument(skip(self, data), fields(goal_id = %data.id))]
    async fn create_savings_goal(&self, data: &NewSavingsGoal) -> Result<SavingsGoal, AppError> {
        let sql = format!(
            r#"
            INSERT INTO savings_goals
                (id, user_id, name, target_amount, current_amount, target_date, is_achieved)
            VALUES ($1, $2, $3, $4, $5, $6, $5 >= $4)
            RETURNING {}
            "#,
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.user_id)
            .bind(&data.name)
            .bind(data.target_amount)
            .bind(data.current_amount)
            .bind(data.target_date)
            .fetch_one(&self.pool)
            .await?;
        row_to_goal(&row)
    }

    #[instrument(skip(self, changes))]
    async fn update_savings_goal(
        &self,
        user_id: &str,
        id: &str,
        changes: &SavingsGoalChanges,
    ) -> Result<Option<SavingsGoal>, AppError> {
        let sql = format!(
            r#"
            UPDATE savings_goals SET
                name = COALESCE($3, name),
                target_amount = COALESCE($4, target_amount),
                current_amount = COALESCE($5, current_amount),
                target_date = COALESCE($6, target_date),
                is_achieved = COALESCE($5, current_amount) >= COALESCE($4, target_amount),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&changes.name)
            .bind(changes.target_amount)
            .bind(changes.current_amount)
            .bind(changes.target_date)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_goal).transpose()
    }

    #[instrument(skip(self))]
    async fn add_contribution(
        &self,
        user_id: &str,
        id: &str,
        amount: Decimal,
    ) -> Result<Option<SavingsGoal>, AppError> {
        let sql = format!(
            r#"
            UPDATE savings_goals SET
                current_amount = current_amount + $3,
                is_achieved = current_amount + $3 >= target_amount,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_goal).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_savings_goal(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM savings_goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_profile).transpose()
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, AppError> {
        let sql = format!(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                preferred_currency = COALESCE($3, preferred_currency),
                notification_preferences = COALESCE($4, notification_preferences),
                onboarding_completed = COALESCE($5, onboarding_completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(&changes.full_name)
            .bind(&changes.preferred_currency)
            .bind(&changes.notification_preferences)
            .bind(changes.onboarding_completed)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_profile).transpose()
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }
}
