//! User account routes
//!
//! Sign-up and token issuance are public; the profile endpoint requires a
//! token. POST on `/me` is answered with 405 by the router.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use recipe_api_shared::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateProfileRequest, UserResponse,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_user))
        .route("/token", post(create_token))
        .route(
            "/me",
            get(get_profile).patch(update_profile).put(update_profile),
        )
}

/// POST /api/user/create
async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::create_user(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/user/token
async fn create_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = UserService::issue_token(state.db(), state.jwt(), req).await?;
    Ok(Json(token))
}

/// GET /api/user/me
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let profile = UserService::get_profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}

/// PATCH|PUT /api/user/me
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let profile = UserService::update_profile(state.db(), auth.user_id, req).await?;
    Ok(Json(profile))
}
