//! Bank feed, exchange rates and spending tips.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::api::extract::ApiQuery;
use crate::app::AppState;
use crate::domain::{
    AppError, BankTransactionsResponse, Caller, ErrorResponse, ExchangeRateQuery,
    ExchangeRateResponse, TipsResponse,
};

/// Transactions from the mock bank for the caller
#[utoipa::path(
    get,
    path = "/api/bank/mockbank",
    tag = "integrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bank transactions", body = BankTransactionsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Bank unavailable", body = ErrorResponse)
    )
)]
pub async fn bank_transactions_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<BankTransactionsResponse>, AppError> {
    Ok(Json(state.service.bank_transactions(&caller.id).await?))
}

/// USD conversion rate for a currency
#[utoipa::path(
    get,
    path = "/api/exchange-rate",
    tag = "integrations",
    params(ExchangeRateQuery),
    responses(
        (status = 200, description = "Rate and symbol", body = ExchangeRateResponse),
        (status = 400, description = "Missing currency query param", body = ErrorResponse),
        (status = 404, description = "Currency not found in rates", body = ErrorResponse),
        (status = 500, description = "Rate provider unavailable", body = ErrorResponse)
    )
)]
pub async fn exchange_rate_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ExchangeRateQuery>,
) -> Result<Json<ExchangeRateResponse>, AppError> {
    Ok(Json(state.service.exchange_rate(&query).await?))
}

/// Spending tips generated from the caller's transactions
#[utoipa::path(
    get,
    path = "/api/analyze-transactions",
    tag = "integrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tips, empty when there are no transactions", body = TipsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Advisor unavailable", body = ErrorResponse)
    )
)]
pub async fn analyze_transactions_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<TipsResponse>, AppError> {
    Ok(Json(state.service.analyze_transactions(&caller.id).await?))
}
