//! Recipe API Shared Library
//!
//! Request/response types, input validation and list-filter parsing used by
//! the backend and by API clients.

pub mod errors;
pub mod filters;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use filters::{LabelFilter, LabelListQuery, RecipeFilter, RecipeListQuery};
pub use types::*;
