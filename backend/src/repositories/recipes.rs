//! Recipe repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use recipe_api_shared::RecipeFilter;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Recipe record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scalar recipe fields written on create and update
#[derive(Debug, Clone)]
pub struct RecipeFields {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
}

/// Recipe repository
pub struct RecipeRepository;

impl RecipeRepository {
    /// List a user's recipes, newest first.
    ///
    /// Each present id list in `filter` narrows the result to recipes linked
    /// to at least one of those ids; both lists must match when both are given.
    pub async fn list(pool: &PgPool, user_id: Uuid, filter: &RecipeFilter) -> Result<Vec<RecipeRecord>> {
        let recipes = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT r.id, r.user_id, r.title, r.time_minutes, r.price, r.link, r.image,
                   r.created_at, r.updated_at
            FROM recipes r
            WHERE r.user_id = $1
              AND ($2::BIGINT[] IS NULL OR EXISTS (
                  SELECT 1 FROM recipe_tags rt
                  WHERE rt.recipe_id = r.id AND rt.tag_id = ANY($2)
              ))
              AND ($3::BIGINT[] IS NULL OR EXISTS (
                  SELECT 1 FROM recipe_ingredients ri
                  WHERE ri.recipe_id = r.id AND ri.ingredient_id = ANY($3)
              ))
            ORDER BY r.id DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.tag_ids.as_deref())
        .bind(filter.ingredient_ids.as_deref())
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Find recipe by ID and user (for ownership check)
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: i64,
        user_id: Uuid,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// Same as [`Self::find_by_id_and_user`], locking the row for the
    /// rest of the transaction
    pub async fn lock_by_id_and_user(
        conn: &mut PgConnection,
        id: i64,
        user_id: Uuid,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(recipe)
    }

    /// Insert a recipe
    pub async fn create(
        conn: &mut PgConnection,
        user_id: Uuid,
        fields: &RecipeFields,
    ) -> Result<RecipeRecord> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&fields.title)
        .bind(fields.time_minutes)
        .bind(fields.price)
        .bind(&fields.link)
        .fetch_one(conn)
        .await?;

        Ok(recipe)
    }

    /// Overwrite the scalar fields of a recipe
    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        user_id: Uuid,
        fields: &RecipeFields,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            UPDATE recipes SET
                title = $3,
                time_minutes = $4,
                price = $5,
                link = $6,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.title)
        .bind(fields.time_minutes)
        .bind(fields.price)
        .bind(&fields.link)
        .fetch_optional(conn)
        .await?;

        Ok(recipe)
    }

    /// Point a recipe at a new image path
    pub async fn set_image(
        conn: &mut PgConnection,
        id: i64,
        user_id: Uuid,
        image: &str,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            UPDATE recipes SET image = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(image)
        .fetch_optional(conn)
        .await?;

        Ok(recipe)
    }

    /// Delete a recipe, returning the deleted row so its image can be cleaned up
    pub async fn delete(pool: &PgPool, id: i64, user_id: Uuid) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            DELETE FROM recipes
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }
}
