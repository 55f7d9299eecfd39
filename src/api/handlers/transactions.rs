//! Transaction CRUD, income/expense listings and the monthly summary.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::app::AppState;
use crate::domain::{
    AppError, Caller, CreateTransactionRequest, ErrorResponse, PeriodQuery, Transaction,
    TransactionQuery, TransactionType, UpdateTransactionRequest,
};

/// List the caller's transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = Vec<Transaction>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_transactions_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.service.list_transactions(&caller.id, query).await?))
}

/// List the caller's income
#[utoipa::path(
    get,
    path = "/api/transactions/income",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Income transactions", body = Vec<Transaction>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_income_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let rows = state
        .service
        .list_transactions_of_kind(&caller.id, TransactionType::Income)
        .await?;
    Ok(Json(rows))
}

/// List the caller's expenses
#[utoipa::path(
    get,
    path = "/api/transactions/expenses",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Expense transactions", body = Vec<Transaction>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_expenses_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let rows = state
        .service
        .list_transactions_of_kind(&caller.id, TransactionType::Expense)
        .await?;
    Ok(Json(rows))
}

/// Record a transaction
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_transaction_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let created = state
        .service
        .create_transaction(&caller.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update one of the caller's transactions
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transaction ID")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
pub async fn update_transaction_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let updated = state
        .service
        .update_transaction(&caller.id, &id, &payload)
        .await?;
    Ok(Json(updated))
}

/// Delete one of the caller's transactions
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
pub async fn delete_transaction_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete_transaction(&caller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Income, expense and net totals for a month
#[utoipa::path(
    get,
    path = "/api/transactions/summary",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Summary rows", body = Vec<serde_json::Value>),
        (status = 400, description = "Invalid period", body = ErrorResponse)
    )
)]
pub async fn monthly_summary_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiQuery(period): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<serde_json::Value>>, AppError> {
    Ok(Json(state.service.monthly_summary(&caller.id, &period).await?))
}
