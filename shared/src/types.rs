//! API request and response types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// User Types
// ============================================================================

/// Sign-up request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Public view of a user account. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

/// Token issuance request. Missing fields are treated as blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token issuance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Profile update. The email is read-only and ignored if sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// ============================================================================
// Tag and Ingredient Types
// ============================================================================

/// Create or rename a tag or ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelRequest {
    #[serde(default)]
    pub name: String,
}

/// A tag or ingredient as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResponse {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// Recipe Types
// ============================================================================

/// Create a recipe, or replace one wholesale (PUT).
///
/// Omitted `tags`/`ingredients` mean "none", which on a full update clears
/// the existing associations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub ingredients: Vec<i64>,
}

/// Partial recipe update (PATCH). Only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchRecipeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time_minutes: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
    #[serde(default)]
    pub ingredients: Option<Vec<i64>>,
}

/// Recipe list entry: associations are listed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
    pub image: Option<String>,
}

/// Recipe detail: associations are expanded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<LabelResponse>,
    pub ingredients: Vec<LabelResponse>,
    pub image: Option<String>,
}

/// Result of an image upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeImageResponse {
    pub id: i64,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_request_defaults() {
        let req: RecipeRequest =
            serde_json::from_value(json!({"title": "t", "time_minutes": 30, "price": 5})).unwrap();
        assert_eq!(req.price, Decimal::new(5, 0));
        assert!(req.tags.is_empty());
        assert!(req.ingredients.is_empty());
        assert!(req.link.is_none());
    }

    #[test]
    fn test_recipe_request_accepts_string_price() {
        let req: RecipeRequest = serde_json::from_value(
            json!({"title": "t", "time_minutes": 30, "price": "5.50", "tags": [1, 2]}),
        )
        .unwrap();
        assert_eq!(req.price, Decimal::new(550, 2));
        assert_eq!(req.tags, vec![1, 2]);
    }

    #[test]
    fn test_patch_distinguishes_absent_from_empty() {
        let absent: PatchRecipeRequest = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert!(absent.tags.is_none());

        let empty: PatchRecipeRequest = serde_json::from_value(json!({"tags": []})).unwrap();
        assert_eq!(empty.tags, Some(vec![]));
    }

    #[test]
    fn test_price_serializes_as_string() {
        let recipe = RecipeResponse {
            id: 1,
            title: "Soup".to_string(),
            time_minutes: 10,
            price: Decimal::new(500, 2),
            link: String::new(),
            tags: vec![],
            ingredients: vec![],
            image: None,
        };
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["price"], "5.00");
        assert!(value["image"].is_null());
    }

    #[test]
    fn test_user_response_has_no_password() {
        let value = serde_json::to_value(UserResponse {
            email: "test@test.com".to_string(),
            name: "test".to_string(),
        })
        .unwrap();
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_profile_update_ignores_email() {
        let req: UpdateProfileRequest =
            serde_json::from_value(json!({"email": "x@y.com", "name": "new"})).unwrap();
        assert_eq!(req.name.as_deref(), Some("new"));
        assert!(req.password.is_none());
    }
}
