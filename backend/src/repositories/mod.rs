//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod labels;
pub mod recipes;
pub mod user;

pub use labels::{LabelKind, LabelRecord, LabelRepository};
pub use recipes::{RecipeFields, RecipeRecord, RecipeRepository};
pub use user::{UserRecord, UserRepository};

/// Whether a repository error is a unique-constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

/// Whether a repository error is a foreign-key violation, e.g. an insert
/// owned by a user that was deleted mid-request
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}
