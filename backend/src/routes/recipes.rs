//! Recipe routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use recipe_api_shared::{
    FieldError, PatchRecipeRequest, RecipeDetailResponse, RecipeFilter, RecipeImageResponse,
    RecipeListQuery, RecipeRequest, RecipeResponse,
};

/// Multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "image";

/// Create recipe routes
pub fn recipe_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route(
            "/:id",
            get(get_recipe)
                .put(replace_recipe)
                .patch(patch_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/:id/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

/// GET /api/recipe/recipes?tags=1,2&ingredients=3
async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<RecipeListQuery>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let filter = RecipeFilter::try_from(query)?;
    let recipes = RecipeService::list(state.db(), auth.user_id, filter).await?;
    Ok(Json(recipes))
}

/// POST /api/recipe/recipes
async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<RecipeRequest>,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    let recipe = RecipeService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/recipe/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let recipe = RecipeService::retrieve(state.db(), auth.user_id, id).await?;
    Ok(Json(recipe))
}

/// PUT /api/recipe/recipes/:id
async fn replace_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<RecipeRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe = RecipeService::replace(state.db(), auth.user_id, id, req).await?;
    Ok(Json(recipe))
}

/// PATCH /api/recipe/recipes/:id
async fn patch_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<PatchRecipeRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe = RecipeService::patch(state.db(), auth.user_id, id, req).await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipe/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    RecipeService::delete(state.db(), state.media(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipe/recipes/:id/upload-image (multipart, field `image`)
async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<RecipeImageResponse>> {
    let bytes = read_image_field(multipart?).await?;
    let image =
        RecipeService::upload_image(state.db(), state.media(), auth.user_id, id, bytes).await?;
    Ok(Json(image))
}

/// Pull the image bytes out of the form, ignoring any other fields
async fn read_image_field(mut multipart: Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field.bytes().await.map_err(multipart_error)?;
            return Ok(data.to_vec());
        }
    }

    Err(ApiError::field(IMAGE_FIELD, "No file was submitted"))
}

/// Body-limit hits become 413 on the image field. Anything else is a malformed form.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(FieldError::new(
            IMAGE_FIELD,
            "The submitted file is too large",
        ))
    } else {
        ApiError::BadRequest(format!("Multipart error: {}", err.body_text()))
    }
}
