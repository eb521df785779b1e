//! Health check endpoints
//!
//! - /health: process is up
//! - /health/ready: database reachable and media directory writable
//! - /health/live: always OK while the server runs

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::path::Path;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<DependencyChecks>,
}

impl HealthResponse {
    fn simple(status: &'static str) -> Self {
        Self {
            status,
            version: SERVICE_VERSION,
            checks: None,
        }
    }
}

/// Per-dependency results reported by the readiness check
#[derive(Debug, Serialize)]
pub struct DependencyChecks {
    pub database: CheckStatus,
    pub media: CheckStatus,
}

impl DependencyChecks {
    fn all_healthy(&self) -> bool {
        self.database.healthy && self.media.healthy
    }
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                healthy: true,
                message: None,
            },
            Err(e) => Self {
                healthy: false,
                message: Some(e.to_string()),
            },
        }
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::simple("healthy"))
}

/// GET /health/ready. 503 when a dependency is down.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let checks = DependencyChecks {
        database: CheckStatus::from_result(db::health_check(state.db()).await),
        media: CheckStatus::from_result(check_media_root(state.media().root()).await),
    };

    if checks.all_healthy() {
        Ok(Json(HealthResponse {
            status: "ready",
            version: SERVICE_VERSION,
            checks: Some(checks),
        }))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "not_ready",
                version: SERVICE_VERSION,
                checks: Some(checks),
            }),
        ))
    }
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::simple("alive"))
}

async fn check_media_root(root: &Path) -> Result<(), String> {
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| format!("{}: {}", root.display(), e))?;

    if !metadata.is_dir() {
        return Err(format!("{} is not a directory", root.display()));
    }
    if metadata.permissions().readonly() {
        return Err(format!("{} is read-only", root.display()));
    }
    Ok(())
}
