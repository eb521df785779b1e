//! Business logic services
//!
//! Services validate input, enforce per-user ownership and coordinate
//! repositories and file storage.

pub mod labels;
pub mod recipes;
pub mod user;

pub use labels::LabelService;
pub use recipes::RecipeService;
pub use user::UserService;

use crate::error::ApiError;
use crate::repositories::{is_foreign_key_violation, UserRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Reject a token whose account was deleted or deactivated after it was
/// issued. Runs after input validation, before any owner-scoped query.
pub(crate) async fn require_active_user(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
    let active = UserRepository::is_active(pool, user_id)
        .await
        .map_err(ApiError::Internal)?;

    if active {
        Ok(())
    } else {
        Err(inactive_user())
    }
}

/// Map a failed owner-scoped insert: a vanished owner row is an auth failure
pub(crate) fn insert_error(err: anyhow::Error) -> ApiError {
    if is_foreign_key_violation(&err) {
        inactive_user()
    } else {
        ApiError::Internal(err)
    }
}

pub(crate) fn inactive_user() -> ApiError {
    ApiError::Unauthorized("User not found or inactive".to_string())
}
