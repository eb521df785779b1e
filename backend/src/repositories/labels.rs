//! Tag and ingredient repository
//!
//! Tags and ingredients have identical storage: a user-owned `(id, name)` row
//! plus a `recipe_id`/`<label>_id` link table. [`LabelKind`] selects which
//! pair of tables a query runs against.

use anyhow::Result;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Which kind of recipe label a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Tag,
    Ingredient,
}

impl LabelKind {
    /// Table holding the labels themselves
    pub fn table(self) -> &'static str {
        match self {
            LabelKind::Tag => "tags",
            LabelKind::Ingredient => "ingredients",
        }
    }

    /// Recipe link table
    pub fn link_table(self) -> &'static str {
        match self {
            LabelKind::Tag => "recipe_tags",
            LabelKind::Ingredient => "recipe_ingredients",
        }
    }

    /// Label column in the link table
    pub fn link_column(self) -> &'static str {
        match self {
            LabelKind::Tag => "tag_id",
            LabelKind::Ingredient => "ingredient_id",
        }
    }

    /// Name of the recipe field that carries this kind of label
    pub fn field(self) -> &'static str {
        match self {
            LabelKind::Tag => "tags",
            LabelKind::Ingredient => "ingredients",
        }
    }

    /// Human readable singular, for messages
    pub fn label(self) -> &'static str {
        match self {
            LabelKind::Tag => "Tag",
            LabelKind::Ingredient => "Ingredient",
        }
    }
}

/// Tag or ingredient row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LabelRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}

/// Recipe/label pair from a link table
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
struct LinkRow {
    recipe_id: i64,
    label_id: i64,
}

/// Repository for tags and ingredients
pub struct LabelRepository;

impl LabelRepository {
    /// List a user's labels by descending name.
    ///
    /// With `assigned_only`, labels not attached to any recipe are skipped.
    /// `EXISTS` keeps a label attached to several recipes from appearing
    /// more than once.
    pub async fn list(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<LabelRecord>> {
        let sql = format!(
            r#"
            SELECT l.id, l.user_id, l.name
            FROM {table} l
            WHERE l.user_id = $1
              AND (NOT $2 OR EXISTS (
                  SELECT 1 FROM {link} x WHERE x.{column} = l.id
              ))
            ORDER BY l.name DESC, l.id DESC
            "#,
            table = kind.table(),
            link = kind.link_table(),
            column = kind.link_column(),
        );

        let labels = sqlx::query_as::<_, LabelRecord>(&sql)
            .bind(user_id)
            .bind(assigned_only)
            .fetch_all(pool)
            .await?;

        Ok(labels)
    }

    /// Create a label
    pub async fn create(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        name: &str,
    ) -> Result<LabelRecord> {
        let sql = format!(
            "INSERT INTO {} (user_id, name) VALUES ($1, $2) RETURNING id, user_id, name",
            kind.table()
        );

        let label = sqlx::query_as::<_, LabelRecord>(&sql)
            .bind(user_id)
            .bind(name)
            .fetch_one(pool)
            .await?;

        Ok(label)
    }

    /// Rename a label owned by `user_id`
    pub async fn rename(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<LabelRecord>> {
        let sql = format!(
            r#"
            UPDATE {} SET name = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name
            "#,
            kind.table()
        );

        let label = sqlx::query_as::<_, LabelRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(name)
            .fetch_optional(pool)
            .await?;

        Ok(label)
    }

    /// Delete a label owned by `user_id`. Its recipe links cascade.
    pub async fn delete(pool: &PgPool, kind: LabelKind, user_id: Uuid, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Which of `ids` exist and belong to `user_id`
    pub async fn owned_ids(
        conn: &mut PgConnection,
        kind: LabelKind,
        user_id: Uuid,
        ids: &[i64],
    ) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id FROM {} WHERE user_id = $1 AND id = ANY($2)",
            kind.table()
        );

        let owned = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .bind(ids)
            .fetch_all(conn)
            .await?;

        Ok(owned)
    }

    /// Replace the set of labels attached to a recipe
    pub async fn replace_links(
        conn: &mut PgConnection,
        kind: LabelKind,
        recipe_id: i64,
        ids: &[i64],
    ) -> Result<()> {
        let delete = format!("DELETE FROM {} WHERE recipe_id = $1", kind.link_table());
        sqlx::query(&delete)
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        if ids.is_empty() {
            return Ok(());
        }

        let insert = format!(
            r#"
            INSERT INTO {link} (recipe_id, {column})
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
            link = kind.link_table(),
            column = kind.link_column(),
        );
        sqlx::query(&insert)
            .bind(recipe_id)
            .bind(ids)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Label ids attached to each of `recipe_ids`, ascending per recipe
    pub async fn ids_by_recipe(
        pool: &PgPool,
        kind: LabelKind,
        recipe_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<i64>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            r#"
            SELECT recipe_id, {column} AS label_id
            FROM {link}
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, {column}
            "#,
            link = kind.link_table(),
            column = kind.link_column(),
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(recipe_ids)
            .fetch_all(pool)
            .await?;

        let mut by_recipe: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in rows {
            by_recipe.entry(row.recipe_id).or_default().push(row.label_id);
        }
        Ok(by_recipe)
    }

    /// Full label rows attached to one recipe, ascending by id
    pub async fn for_recipe(
        pool: &PgPool,
        kind: LabelKind,
        recipe_id: i64,
    ) -> Result<Vec<LabelRecord>> {
        let sql = format!(
            r#"
            SELECT l.id, l.user_id, l.name
            FROM {table} l
            JOIN {link} x ON x.{column} = l.id
            WHERE x.recipe_id = $1
            ORDER BY l.id
            "#,
            table = kind.table(),
            link = kind.link_table(),
            column = kind.link_column(),
        );

        let labels = sqlx::query_as::<_, LabelRecord>(&sql)
            .bind(recipe_id)
            .fetch_all(pool)
            .await?;

        Ok(labels)
    }
}
