use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::app::AppState;
use crate::domain::{
    AppError, Budget, Caller, CreateBudgetRequest, ErrorResponse, PeriodQuery,
    UpdateBudgetRequest,
};

/// Budgets for a month
#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Budgets for the period", body = Vec<Budget>),
        (status = 400, description = "Invalid period", body = ErrorResponse)
    )
)]
pub async fn list_budgets_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiQuery(period): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<Budget>>, AppError> {
    Ok(Json(state.service.list_budgets(&caller.id, &period).await?))
}

/// Spending against each budget for a month
#[utoipa::path(
    get,
    path = "/api/budgets/status",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Budget status rows", body = Vec<serde_json::Value>),
        (status = 400, description = "Invalid period", body = ErrorResponse)
    )
)]
pub async fn budget_status_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiQuery(period): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<serde_json::Value>>, AppError> {
    Ok(Json(state.service.budget_status(&caller.id, &period).await?))
}

/// Create a monthly budget for a category
#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "budgets",
    security(("bearer_auth" = [])),
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created", body = Budget),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Budget already exists for the period", body = ErrorResponse)
    )
)]
pub async fn create_budget_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let created = state.service.create_budget(&caller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change a budget's amount
#[utoipa::path(
    put,
    path = "/api/budgets/{id}",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Budget ID")),
    request_body = UpdateBudgetRequest,
    responses(
        (status = 200, description = "Budget updated", body = Budget),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn update_budget_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateBudgetRequest>,
) -> Result<Json<Budget>, AppError> {
    Ok(Json(
        state.service.update_budget(&caller.id, &id, &payload).await?,
    ))
}

/// Delete a budget
#[utoipa::path(
    delete,
    path = "/api/budgets/{id}",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Budget ID")),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn delete_budget_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete_budget(&caller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
