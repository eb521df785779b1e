//! Query parameter parsing for list endpoints
//!
//! Recipes can be narrowed by `tags` and `ingredients`, each a
//! comma-separated list of integer ids (`?tags=1,4`). Tags and ingredients
//! can be narrowed with the `assigned_only` flag. Parsing is kept free of
//! I/O so the backend only ever sees well-formed filters.

use crate::errors::{FieldError, FilterError};
use serde::{Deserialize, Serialize};

/// Raw query string for `GET /recipes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeListQuery {
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
}

/// Raw query string for the tag and ingredient list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelListQuery {
    #[serde(default)]
    pub assigned_only: Option<String>,
}

/// Parsed recipe filter. `None` means the dimension is unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_ids: Option<Vec<i64>>,
    pub ingredient_ids: Option<Vec<i64>>,
}

impl RecipeFilter {
    pub fn is_unfiltered(&self) -> bool {
        self.tag_ids.is_none() && self.ingredient_ids.is_none()
    }
}

impl TryFrom<RecipeListQuery> for RecipeFilter {
    type Error = FieldError;

    fn try_from(query: RecipeListQuery) -> Result<Self, Self::Error> {
        let tag_ids = parse_optional_ids(query.tags.as_deref()).map_err(|e| e.for_param("tags"))?;
        let ingredient_ids = parse_optional_ids(query.ingredients.as_deref())
            .map_err(|e| e.for_param("ingredients"))?;

        Ok(Self {
            tag_ids,
            ingredient_ids,
        })
    }
}

/// Parsed tag/ingredient filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelFilter {
    pub assigned_only: bool,
}

impl TryFrom<LabelListQuery> for LabelFilter {
    type Error = FieldError;

    fn try_from(query: LabelListQuery) -> Result<Self, Self::Error> {
        let assigned_only =
            parse_flag(query.assigned_only.as_deref()).map_err(|e| e.for_param("assigned_only"))?;
        Ok(Self { assigned_only })
    }
}

/// Parse a comma-separated list of ids.
///
/// Surrounding whitespace is ignored and duplicates are dropped, keeping the
/// first occurrence. An empty (or all-whitespace) string yields an empty list.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, FilterError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<i64> = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        let id = token.parse::<i64>().map_err(|_| FilterError::InvalidId {
            token: token.to_string(),
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Like [`parse_id_list`], but an absent or empty parameter means "no filter"
pub fn parse_optional_ids(raw: Option<&str>) -> Result<Option<Vec<i64>>, FilterError> {
    match raw {
        None => Ok(None),
        Some(raw) => {
            let ids = parse_id_list(raw)?;
            Ok(if ids.is_empty() { None } else { Some(ids) })
        }
    }
}

/// Interpret a truthy query flag. Absent means `false`.
pub fn parse_flag(raw: Option<&str>) -> Result<bool, FilterError> {
    let Some(raw) = raw else {
        return Ok(false);
    };

    let value = raw.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n != 0);
    }

    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" | "" => Ok(false),
        _ => Err(FilterError::InvalidFlag {
            value: raw.to_string(),
        }),
    }
}
