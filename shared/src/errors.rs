//! Error types shared between the API and its clients

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validation failure attached to a single input field
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors produced while parsing list query parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("'{token}' is not a valid integer id")]
    InvalidId { token: String },

    #[error("'{value}' is not a valid boolean flag")]
    InvalidFlag { value: String },
}

impl FilterError {
    /// Attach the offending query parameter name
    pub fn for_param(self, param: &str) -> FieldError {
        FieldError::new(param, self.to_string())
    }
}
