//! HTTP request handlers with OpenAPI documentation.

pub mod budgets;
pub mod categories;
pub mod external;
pub mod profile;
pub mod savings;
pub mod transactions;
pub mod users;

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::app::AppState;
use crate::domain::{
    AuthResponse, BankTransactionsResponse, Budget, Category, CategorySummary,
    ContributionRequest, CreateBudgetRequest, CreateCategoryRequest, CreateSavingsGoalRequest,
    CreateTransactionRequest, ErrorDetail, ErrorResponse, ExchangeRateResponse, HealthResponse,
    HealthStatus, LoginRequest, Profile, PublicUser, RateLimitResponse,
    SavingsGoal, SignupRequest, TipsResponse, Transaction, TransactionType, UpdateBudgetRequest,
    UpdateCategoryRequest, UpdateProfileRequest, UpdateSavingsGoalRequest,
    UpdateTransactionRequest, UpdateUserRequest, UserResponse,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Personal Finance API",
        version = "1.0.0",
        description = "Transactions, budgets, savings goals and spending insights for personal finance",
        license(
            name = "MIT"
        )
    ),
    modifiers(&SecurityAddon),
    paths(
        users::signup_handler,
        users::login_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::update_user_handler,
        transactions::list_transactions_handler,
        transactions::list_income_handler,
        transactions::list_expenses_handler,
        transactions::create_transaction_handler,
        transactions::update_transaction_handler,
        transactions::delete_transaction_handler,
        transactions::monthly_summary_handler,
        categories::list_categories_handler,
        categories::create_category_handler,
        categories::update_category_handler,
        categories::delete_category_handler,
        budgets::list_budgets_handler,
        budgets::budget_status_handler,
        budgets::create_budget_handler,
        budgets::update_budget_handler,
        budgets::delete_budget_handler,
        savings::list_savings_goals_handler,
        savings::create_savings_goal_handler,
        savings::update_savings_goal_handler,
        savings::add_contribution_handler,
        savings::delete_savings_goal_handler,
        profile::get_profile_handler,
        profile::update_profile_handler,
        profile::complete_onboarding_handler,
        external::bank_transactions_handler,
        external::exchange_rate_handler,
        external::analyze_transactions_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            PublicUser,
            SignupRequest,
            LoginRequest,
            UpdateUserRequest,
            AuthResponse,
            UserResponse,
            Transaction,
            TransactionType,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            Category,
            CategorySummary,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            Budget,
            CreateBudgetRequest,
            UpdateBudgetRequest,
            SavingsGoal,
            CreateSavingsGoalRequest,
            UpdateSavingsGoalRequest,
            ContributionRequest,
            Profile,
            UpdateProfileRequest,
            BankTransactionsResponse,
            ExchangeRateResponse,
            TipsResponse,
            HealthResponse,
            HealthStatus,
            ErrorResponse,
            ErrorDetail,
            RateLimitResponse,
        )
    ),
    tags(
        (name = "users", description = "Signup, login and accounts"),
        (name = "transactions", description = "Income and expense records"),
        (name = "categories", description = "Default and custom categories"),
        (name = "budgets", description = "Monthly category budgets"),
        (name = "savings-goals", description = "Savings targets and contributions"),
        (name = "profile", description = "Per-user settings"),
        (name = "integrations", description = "Bank feed, exchange rates and AI tips"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.service.health_check().await)
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.service.health_check().await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus scrape output.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/users/signup",
            "/users/{id}",
            "/api/transactions",
            "/api/transactions/summary",
            "/api/categories/{id}",
            "/api/budgets/status",
            "/api/savings-goals/{id}/add",
            "/api/profile/complete-onboarding",
            "/api/exchange-rate",
            "/health/ready",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_openapi_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
