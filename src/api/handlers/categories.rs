use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::app::AppState;
use crate::domain::{
    AppError, Caller, Category, CategoryQuery, CreateCategoryRequest, ErrorResponse,
    UpdateCategoryRequest,
};

/// List default and own categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(CategoryQuery),
    responses(
        (status = 200, description = "Defaults first, then by name", body = Vec<Category>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.service.list_categories(&caller.id, &query).await?))
}

/// Create a custom category
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_category_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let created = state.service.create_category(&caller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename or recolour an own category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found or not editable", body = ErrorResponse)
    )
)]
pub async fn update_category_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(
        state
            .service
            .update_category(&caller.id, &id, &payload)
            .await?,
    ))
}

/// Delete an own category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Category still used by transactions", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn delete_category_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete_category(&caller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
