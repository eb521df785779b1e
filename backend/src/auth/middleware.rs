//! Request authentication
//!
//! [`AuthUser`] is an extractor: adding it to a handler's arguments makes the
//! route require a valid token. The extractor only verifies the token
//! signature and expiry. Services confirm the account still exists and is
//! active (`services::require_active_user`) once the request body has been
//! validated, so a token outliving its user gets 401.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

/// Accepted `Authorization` schemes
const AUTH_SCHEMES: [&str; 2] = ["Bearer ", "Token "];

/// Authenticated user extracted from the `Authorization` header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication credentials were not provided".to_string()))?;

        let token = bearer_token(auth_header)
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        let user_id = app_state
            .jwt()
            .user_id_from_token(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(AuthUser { user_id })
    }
}

/// Strip a supported scheme prefix from an `Authorization` header value
fn bearer_token(header: &str) -> Option<&str> {
    AUTH_SCHEMES
        .iter()
        .find_map(|scheme| header.strip_prefix(scheme))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
