//! Tag and ingredient service

use crate::error::ApiError;
use crate::repositories::{LabelKind, LabelRecord, LabelRepository};
use crate::services::{insert_error, require_active_user};
use recipe_api_shared::validation::validate_required_text;
use recipe_api_shared::{LabelFilter, LabelRequest, LabelResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LabelService;

impl LabelService {
    /// List the user's labels of `kind`, by descending name
    pub async fn list(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        filter: LabelFilter,
    ) -> Result<Vec<LabelResponse>, ApiError> {
        require_active_user(pool, user_id).await?;

        let labels = LabelRepository::list(pool, kind, user_id, filter.assigned_only)
            .await
            .map_err(ApiError::Internal)?;

        Ok(labels.into_iter().map(to_response).collect())
    }

    /// Create a label for the user
    pub async fn create(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        req: LabelRequest,
    ) -> Result<LabelResponse, ApiError> {
        let name = validated_name(&req)?;
        require_active_user(pool, user_id).await?;

        let label = LabelRepository::create(pool, kind, user_id, name)
            .await
            .map_err(insert_error)?;

        Ok(to_response(label))
    }

    /// Rename one of the user's labels
    pub async fn rename(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        id: i64,
        req: LabelRequest,
    ) -> Result<LabelResponse, ApiError> {
        let name = validated_name(&req)?;
        require_active_user(pool, user_id).await?;

        let label = LabelRepository::rename(pool, kind, user_id, id, name)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| not_found(kind))?;

        Ok(to_response(label))
    }

    /// Delete one of the user's labels, detaching it from every recipe
    pub async fn delete(
        pool: &PgPool,
        kind: LabelKind,
        user_id: Uuid,
        id: i64,
    ) -> Result<(), ApiError> {
        require_active_user(pool, user_id).await?;

        let deleted = LabelRepository::delete(pool, kind, user_id, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted {
            Ok(())
        } else {
            Err(not_found(kind))
        }
    }
}

fn validated_name(req: &LabelRequest) -> Result<&str, ApiError> {
    validate_required_text("name", &req.name)?;
    Ok(req.name.trim())
}

fn not_found(kind: LabelKind) -> ApiError {
    ApiError::NotFound(format!("{} not found", kind.label()))
}

pub(crate) fn to_response(label: LabelRecord) -> LabelResponse {
    LabelResponse {
        id: label.id,
        name: label.name,
    }
}
