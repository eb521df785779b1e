//! Route definitions for the Recipe API
//!
//! This module organizes all API routes and applies middleware.

use crate::media::MEDIA_URL_PREFIX;
use crate::repositories::LabelKind;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod extract;
mod health;
mod labels;
mod recipes;
mod user;

#[cfg(test)]
mod validation_tests;

pub use labels::label_routes;
pub use recipes::recipe_routes;
pub use user::user_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config().media.max_upload_bytes;
    let media = ServeDir::new(state.media().root());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/user", user::user_routes())
        .nest("/api/recipe", recipe_api_routes(max_upload_bytes))
        .nest_service(MEDIA_URL_PREFIX, media)
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Recipe, tag and ingredient routes
fn recipe_api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/tags", labels::label_routes(LabelKind::Tag))
        .nest("/ingredients", labels::label_routes(LabelKind::Ingredient))
        .nest("/recipes", recipes::recipe_routes(max_upload_bytes))
}
