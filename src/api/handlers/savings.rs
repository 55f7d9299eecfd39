use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::extract::ApiJson;
use crate::app::AppState;
use crate::domain::{
    AppError, Caller, ContributionRequest, CreateSavingsGoalRequest, ErrorResponse, SavingsGoal,
    UpdateSavingsGoalRequest,
};

/// List the caller's savings goals
#[utoipa::path(
    get,
    path = "/api/savings-goals",
    tag = "savings-goals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Goals, newest first", body = Vec<SavingsGoal>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_savings_goals_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<SavingsGoal>>, AppError> {
    Ok(Json(state.service.list_savings_goals(&caller.id).await?))
}

/// Create a savings goal
#[utoipa::path(
    post,
    path = "/api/savings-goals",
    tag = "savings-goals",
    security(("bearer_auth" = [])),
    request_body = CreateSavingsGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = SavingsGoal),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_savings_goal_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateSavingsGoalRequest>,
) -> Result<(StatusCode, Json<SavingsGoal>), AppError> {
    let created = state
        .service
        .create_savings_goal(&caller.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a savings goal
#[utoipa::path(
    put,
    path = "/api/savings-goals/{id}",
    tag = "savings-goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Savings goal ID")),
    request_body = UpdateSavingsGoalRequest,
    responses(
        (status = 200, description = "Goal updated", body = SavingsGoal),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Savings goal not found", body = ErrorResponse)
    )
)]
pub async fn update_savings_goal_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateSavingsGoalRequest>,
) -> Result<Json<SavingsGoal>, AppError> {
    Ok(Json(
        state
            .service
            .update_savings_goal(&caller.id, &id, &payload)
            .await?,
    ))
}

/// Add money to a savings goal
#[utoipa::path(
    post,
    path = "/api/savings-goals/{id}/add",
    tag = "savings-goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Savings goal ID")),
    request_body = ContributionRequest,
    responses(
        (status = 200, description = "Contribution recorded", body = SavingsGoal),
        (status = 400, description = "Amount must be positive", body = ErrorResponse),
        (status = 404, description = "Savings goal not found", body = ErrorResponse)
    )
)]
pub async fn add_contribution_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ContributionRequest>,
) -> Result<Json<SavingsGoal>, AppError> {
    Ok(Json(
        state
            .service
            .add_contribution(&caller.id, &id, &payload)
            .await?,
    ))
}

/// Delete a savings goal
#[utoipa::path(
    delete,
    path = "/api/savings-goals/{id}",
    tag = "savings-goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Savings goal ID")),
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 404, description = "Savings goal not found", body = ErrorResponse)
    )
)]
pub async fn delete_savings_goal_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete_savings_goal(&caller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
