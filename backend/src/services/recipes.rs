//! Recipe service
//!
//! Every write runs in one transaction: the recipe row is written, the
//! referenced tags and ingredients are checked to belong to the same user,
//! and the link tables are replaced. Any failure rolls the whole request back.

use crate::error::ApiError;
use crate::media::{self, MediaStore};
use crate::repositories::{
    LabelKind, LabelRepository, RecipeFields, RecipeRecord, RecipeRepository,
};
use crate::services::{insert_error, labels, require_active_user};
use recipe_api_shared::validation::{
    validate_optional_text, validate_price, validate_required_text, validate_time_minutes,
};
use recipe_api_shared::{
    PatchRecipeRequest, RecipeDetailResponse, RecipeFilter, RecipeImageResponse, RecipeRequest,
    RecipeResponse,
};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Validated write to a recipe. `None` label sets are left untouched.
#[derive(Debug, Clone)]
struct RecipeChanges {
    fields: RecipeFields,
    tags: Option<Vec<i64>>,
    ingredients: Option<Vec<i64>>,
}

pub struct RecipeService;

impl RecipeService {
    /// List the user's recipes matching `filter`, newest first
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        filter: RecipeFilter,
    ) -> Result<Vec<RecipeResponse>, ApiError> {
        require_active_user(pool, user_id).await?;

        let recipes = RecipeRepository::list(pool, user_id, &filter)
            .await
            .map_err(ApiError::Internal)?;
        debug!(
            %user_id,
            filtered = !filter.is_unfiltered(),
            count = recipes.len(),
            "Listed recipes"
        );

        list_responses(pool, recipes).await
    }

    /// Fetch one recipe with its tags and ingredients expanded
    pub async fn retrieve(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
    ) -> Result<RecipeDetailResponse, ApiError> {
        require_active_user(pool, user_id).await?;

        let recipe = RecipeRepository::find_by_id_and_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(recipe_not_found)?;

        let tags = LabelRepository::for_recipe(pool, LabelKind::Tag, recipe.id)
            .await
            .map_err(ApiError::Internal)?;
        let ingredients = LabelRepository::for_recipe(pool, LabelKind::Ingredient, recipe.id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(RecipeDetailResponse {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: tags.into_iter().map(labels::to_response).collect(),
            ingredients: ingredients.into_iter().map(labels::to_response).collect(),
            image: recipe.image.as_deref().map(MediaStore::url_for),
        })
    }

    /// Create a recipe
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: RecipeRequest,
    ) -> Result<RecipeResponse, ApiError> {
        let changes = full_changes(req)?;
        require_active_user(pool, user_id).await?;

        let mut tx = pool.begin().await?;
        let recipe = RecipeRepository::create(&mut tx, user_id, &changes.fields)
            .await
            .map_err(insert_error)?;
        write_labels(&mut tx, user_id, recipe.id, &changes).await?;
        tx.commit().await?;

        info!(recipe_id = recipe.id, %user_id, "Recipe created");
        single_response(pool, recipe).await
    }

    /// Replace a recipe wholesale (PUT). Tags and ingredients not supplied
    /// are cleared.
    pub async fn replace(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        req: RecipeRequest,
    ) -> Result<RecipeResponse, ApiError> {
        let changes = full_changes(req)?;
        require_active_user(pool, user_id).await?;

        let mut tx = pool.begin().await?;
        let recipe = RecipeRepository::update(&mut tx, id, user_id, &changes.fields)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(recipe_not_found)?;
        write_labels(&mut tx, user_id, recipe.id, &changes).await?;
        tx.commit().await?;

        single_response(pool, recipe).await
    }

    /// Update only the supplied fields (PATCH)
    pub async fn patch(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        req: PatchRecipeRequest,
    ) -> Result<RecipeResponse, ApiError> {
        validate_patch(&req)?;
        require_active_user(pool, user_id).await?;

        let mut tx = pool.begin().await?;
        let existing = RecipeRepository::lock_by_id_and_user(&mut tx, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(recipe_not_found)?;

        let changes = RecipeChanges {
            fields: RecipeFields {
                title: req.title.map(|t| t.trim().to_string()).unwrap_or(existing.title),
                time_minutes: req.time_minutes.unwrap_or(existing.time_minutes),
                price: req.price.unwrap_or(existing.price),
                link: req.link.unwrap_or(existing.link),
            },
            tags: req.tags.map(dedup_ids),
            ingredients: req.ingredients.map(dedup_ids),
        };

        let recipe = RecipeRepository::update(&mut tx, id, user_id, &changes.fields)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(recipe_not_found)?;
        write_labels(&mut tx, user_id, recipe.id, &changes).await?;
        tx.commit().await?;

        single_response(pool, recipe).await
    }

    /// Delete a recipe and its stored image
    pub async fn delete(
        pool: &PgPool,
        media: &MediaStore,
        user_id: Uuid,
        id: i64,
    ) -> Result<(), ApiError> {
        require_active_user(pool, user_id).await?;

        let recipe = RecipeRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(recipe_not_found)?;

        if let Some(image) = recipe.image {
            if let Err(e) = media.remove(&image).await {
                warn!(recipe_id = id, error = %e, "Failed to remove image of deleted recipe");
            }
        }

        info!(recipe_id = id, %user_id, "Recipe deleted");
        Ok(())
    }

    /// Attach an image to a recipe, replacing any previous one.
    ///
    /// The upload is fully decoded before anything is written, so a bad
    /// upload leaves the current image in place.
    pub async fn upload_image(
        pool: &PgPool,
        media: &MediaStore,
        user_id: Uuid,
        id: i64,
        bytes: Vec<u8>,
    ) -> Result<RecipeImageResponse, ApiError> {
        let image = media::validate_image(bytes).await?;
        require_active_user(pool, user_id).await?;

        let mut tx = pool.begin().await?;
        let existing = RecipeRepository::lock_by_id_and_user(&mut tx, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(recipe_not_found)?;

        let stored = media
            .save_recipe_image(&image)
            .await
            .map_err(ApiError::Internal)?;

        let committed = async {
            RecipeRepository::set_image(&mut tx, id, user_id, &stored)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(recipe_not_found)?;
            tx.commit().await.map_err(ApiError::Database)
        }
        .await;

        if let Err(e) = committed {
            if let Err(cleanup) = media.remove(&stored).await {
                warn!(path = %stored, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e);
        }

        if let Some(old) = existing.image {
            if let Err(e) = media.remove(&old).await {
                warn!(path = %old, error = %e, "Failed to remove replaced recipe image");
            }
        }

        info!(recipe_id = id, format = ?image.format(), "Recipe image replaced");
        Ok(RecipeImageResponse {
            id,
            image: MediaStore::url_for(&stored),
        })
    }
}

/// Validate a create/PUT body
fn full_changes(req: RecipeRequest) -> Result<RecipeChanges, ApiError> {
    let link = req.link.unwrap_or_default();

    validate_required_text("title", &req.title)?;
    validate_time_minutes(req.time_minutes)?;
    validate_price(req.price)?;
    validate_optional_text("link", &link)?;

    Ok(RecipeChanges {
        fields: RecipeFields {
            title: req.title.trim().to_string(),
            time_minutes: req.time_minutes,
            price: req.price,
            link,
        },
        tags: Some(dedup_ids(req.tags)),
        ingredients: Some(dedup_ids(req.ingredients)),
    })
}

/// Validate only the fields a PATCH body supplies
fn validate_patch(req: &PatchRecipeRequest) -> Result<(), ApiError> {
    if let Some(title) = &req.title {
        validate_required_text("title", title)?;
    }
    if let Some(minutes) = req.time_minutes {
        validate_time_minutes(minutes)?;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(link) = &req.link {
        validate_optional_text("link", link)?;
    }
    Ok(())
}

/// Collapse repeated ids, keeping first-seen order
fn dedup_ids(ids: Vec<i64>) -> Vec<i64> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// Replace whichever label sets `changes` carries, after checking ownership
async fn write_labels(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: i64,
    changes: &RecipeChanges,
) -> Result<(), ApiError> {
    let sets = [
        (LabelKind::Tag, changes.tags.as_deref()),
        (LabelKind::Ingredient, changes.ingredients.as_deref()),
    ];

    for (kind, ids) in sets {
        let Some(ids) = ids else { continue };

        let owned = LabelRepository::owned_ids(&mut *conn, kind, user_id, ids)
            .await
            .map_err(ApiError::Internal)?;
        if let Some(missing) = ids.iter().find(|id| !owned.contains(id)) {
            return Err(ApiError::field(
                kind.field(),
                format!("Invalid pk \"{}\" - object does not exist.", missing),
            ));
        }

        LabelRepository::replace_links(&mut *conn, kind, recipe_id, ids)
            .await
            .map_err(ApiError::Internal)?;
    }

    Ok(())
}

async fn single_response(pool: &PgPool, recipe: RecipeRecord) -> Result<RecipeResponse, ApiError> {
    list_responses(pool, vec![recipe])
        .await?
        .pop()
        .ok_or_else(recipe_not_found)
}

/// Attach tag and ingredient ids to each recipe, preserving order
async fn list_responses(
    pool: &PgPool,
    recipes: Vec<RecipeRecord>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();

    let mut tags = LabelRepository::ids_by_recipe(pool, LabelKind::Tag, &ids)
        .await
        .map_err(ApiError::Internal)?;
    let mut ingredients = LabelRepository::ids_by_recipe(pool, LabelKind::Ingredient, &ids)
        .await
        .map_err(ApiError::Internal)?;

    Ok(recipes
        .into_iter()
        .map(|recipe| RecipeResponse {
            tags: tags.remove(&recipe.id).unwrap_or_default(),
            ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
            image: recipe.image.as_deref().map(MediaStore::url_for),
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
        })
        .collect())
}

fn recipe_not_found() -> ApiError {
    ApiError::NotFound("Recipe not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn request(title: &str, minutes: i32, price: Decimal) -> RecipeRequest {
        RecipeRequest {
            title: title.to_string(),
            time_minutes: minutes,
            price,
            link: None,
            tags: vec![],
            ingredients: vec![],
        }
    }

    #[test]
    fn test_full_changes_clears_omitted_sets() {
        let changes = full_changes(request("Soup", 10, Decimal::new(500, 2))).unwrap();
        assert_eq!(changes.tags, Some(vec![]));
        assert_eq!(changes.ingredients, Some(vec![]));
        assert_eq!(changes.fields.link, "");
    }

    #[test]
    fn test_full_changes_rejects_empty_title() {
        let err = full_changes(request("", 10, Decimal::new(5, 0))).unwrap_err();
        assert!(matches!(err, ApiError::Field(ref f) if f.field == "title"));
    }

    #[test]
    fn test_full_changes_rejects_non_positive_values() {
        assert!(full_changes(request("Soup", 0, Decimal::new(5, 0))).is_err());
        assert!(full_changes(request("Soup", 10, Decimal::ZERO)).is_err());
        assert!(full_changes(request("Soup", 10, Decimal::new(-1, 0))).is_err());
    }

    #[test]
    fn test_full_changes_dedups_ids() {
        let mut req = request("Soup", 10, Decimal::new(5, 0));
        req.tags = vec![3, 1, 3];
        let changes = full_changes(req).unwrap();
        assert_eq!(changes.tags, Some(vec![3, 1]));
    }

    #[test]
    fn test_validate_patch_only_checks_supplied_fields() {
        assert!(validate_patch(&PatchRecipeRequest::default()).is_ok());

        let req = PatchRecipeRequest {
            tags: Some(vec![1]),
            ..Default::default()
        };
        assert!(validate_patch(&req).is_ok());

        let req = PatchRecipeRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_patch(&req).is_err());

        let req = PatchRecipeRequest {
            price: Some(Decimal::new(-5, 0)),
            ..Default::default()
        };
        assert!(validate_patch(&req).is_err());
    }

    #[test]
    fn test_dedup_ids() {
        assert_eq!(dedup_ids(vec![]), Vec::<i64>::new());
        assert_eq!(dedup_ids(vec![2, 2, 1, 2]), vec![2, 1]);
    }
}
