//! Application state management
//!
//! Shared resources passed to every handler via Axum's state extraction.
//! Everything here is cheap to clone and read-only after startup.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::media::MediaStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// - `db`: PgPool is internally Arc'd
/// - `config`: wrapped in Arc
/// - `jwt`: keys derived once, wrapped in Arc
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Uploaded file storage
    pub media: MediaStore,
}

impl AppState {
    /// Create a new application state. Derives the JWT keys, so call it once
    /// at startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs);
        let media = MediaStore::new(&config.media.root);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            media,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn media(&self) -> &MediaStore {
        &self.media
    }
}
