//! Tag and ingredient routes
//!
//! Both resources share these handlers; the router for each is built with
//! its [`LabelKind`] attached as a request extension.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::repositories::LabelKind;
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::LabelService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use recipe_api_shared::{LabelFilter, LabelListQuery, LabelRequest, LabelResponse};

/// Create routes for one kind of label
pub fn label_routes(kind: LabelKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_labels).post(create_label))
        .route(
            "/:id",
            patch(rename_label).put(rename_label).delete(delete_label),
        )
        .layer(Extension(kind))
}

/// GET /api/recipe/{tags,ingredients}?assigned_only=1
async fn list_labels(
    State(state): State<AppState>,
    Extension(kind): Extension<LabelKind>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<LabelListQuery>,
) -> ApiResult<Json<Vec<LabelResponse>>> {
    let filter = LabelFilter::try_from(query)?;
    let labels = LabelService::list(state.db(), kind, auth.user_id, filter).await?;
    Ok(Json(labels))
}

/// POST /api/recipe/{tags,ingredients}
async fn create_label(
    State(state): State<AppState>,
    Extension(kind): Extension<LabelKind>,
    auth: AuthUser,
    ApiJson(req): ApiJson<LabelRequest>,
) -> ApiResult<(StatusCode, Json<LabelResponse>)> {
    let label = LabelService::create(state.db(), kind, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(label)))
}

/// PATCH|PUT /api/recipe/{tags,ingredients}/:id
async fn rename_label(
    State(state): State<AppState>,
    Extension(kind): Extension<LabelKind>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<LabelRequest>,
) -> ApiResult<Json<LabelResponse>> {
    let label = LabelService::rename(state.db(), kind, auth.user_id, id, req).await?;
    Ok(Json(label))
}

/// DELETE /api/recipe/{tags,ingredients}/:id
async fn delete_label(
    State(state): State<AppState>,
    Extension(kind): Extension<LabelKind>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    LabelService::delete(state.db(), kind, auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
