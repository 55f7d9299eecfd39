//! Domain layer containing core business types, traits, and error definitions.

pub mod budget;
pub mod category;
pub mod error;
pub mod external;
pub mod profile;
pub mod savings;
pub mod traits;
pub mod transaction;
pub mod types;
pub mod user;

pub use budget::{Budget, BudgetStatusRow, CreateBudgetRequest, NewBudget, UpdateBudgetRequest};
pub use category::{
    Category, CategoryChanges, CategoryQuery, CategorySummary, CreateCategoryRequest,
    DEFAULT_CATEGORY_COLOR, NewCategory, UpdateCategoryRequest,
};
pub use error::{AppError, ConfigError, DatabaseError, ExternalServiceError, ValidationError};
pub use external::{
    BankTransactionsResponse, ExchangeRateQuery, ExchangeRateResponse, RateTable, TipsResponse,
};
pub use profile::{Profile, ProfileChanges, UpdateProfileRequest};
pub use savings::{
    ContributionRequest, CreateSavingsGoalRequest, NewSavingsGoal, SavingsGoal,
    SavingsGoalChanges, UpdateSavingsGoalRequest, is_goal_achieved,
};
pub use traits::{
    AdvisorClient, BankClient, BudgetRepository, CategoryRepository, DatabaseClient,
    ExchangeRateClient, ProfileRepository, SavingsGoalRepository, TransactionRepository,
    UserRepository,
};
pub use transaction::{
    CreateTransactionRequest, NewTransaction, Transaction, TransactionChanges, TransactionFilter,
    TransactionQuery, UpdateTransactionRequest,
};
pub use types::{
    EntityId, ErrorDetail, ErrorResponse, HealthResponse, HealthStatus, MAX_AMOUNT,
    PeriodQuery, RateLimitResponse, TransactionType, new_id, to_currency,
};
pub use user::{
    AuthResponse, Caller, LoginRequest, NewUser, PublicUser, SignupRequest, UpdateUserRequest,
    User, UserChanges, UserResponse,
};
