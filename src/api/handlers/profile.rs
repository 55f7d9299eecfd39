use std::sync::Arc;

use axum::{Json, extract::State};

use crate::api::extract::ApiJson;
use crate::app::AppState;
use crate::domain::{AppError, Caller, ErrorResponse, Profile, UpdateProfileRequest};

/// The caller's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.service.get_profile(&caller.id).await?))
}

/// Update profile settings
#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.service.update_profile(&caller.id, &payload).await?))
}

/// Mark onboarding as done
#[utoipa::path(
    post,
    path = "/api/profile/complete-onboarding",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn complete_onboarding_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.service.complete_onboarding(&caller.id).await?))
}
