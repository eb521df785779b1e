//! Account storage
//!
//! Emails are stored already normalized, so lookups compare them verbatim.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Columns returned for every [`UserRecord`] query
macro_rules! user_columns {
    () => {
        "id, email, name, password_hash, is_active, created_at, updated_at"
    };
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct UserRepository;

impl UserRepository {
    /// Insert an active account. A duplicate email surfaces as a unique
    /// violation, see [`super::is_unique_violation`].
    pub async fn create(
        pool: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(concat!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING ",
            user_columns!()
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Look up an account by email, active or not
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Look up the account behind a token. Deactivated accounts are treated
    /// as missing.
    pub async fn find_active_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Update name and/or password hash. `None` leaves the column unchanged.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(concat!(
            "UPDATE users SET name = COALESCE($2, name), ",
            "password_hash = COALESCE($3, password_hash), updated_at = NOW() ",
            "WHERE id = $1 AND is_active RETURNING ",
            user_columns!()
        ))
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Whether `id` names an existing, active account
    pub async fn is_active(pool: &PgPool, id: Uuid) -> Result<bool> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND is_active)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(active)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
