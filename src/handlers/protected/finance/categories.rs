use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Category, TxnKind};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    pub kind: TxnKind,
    pub color: String,
}

/// GET /api/finance/categories
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<Category>> {
    let pool = DatabaseManager::pool().await?;
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = $1 ORDER BY name",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/finance/categories
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<Category> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Category name is required"));
    }
    let pool = DatabaseManager::pool().await?;

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM categories WHERE user_id = $1 AND name = $2")
            .bind(auth.user_id)
            .bind(body.name.trim())
            .fetch_optional(&pool)
            .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("A category with this name already exists"));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, user_id, name, kind, color)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.name.trim())
    .bind(body.kind)
    .bind(&body.color)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(category))
}

/// PUT /api/finance/categories/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<Category> {
    let pool = DatabaseManager::pool().await?;
    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $3, kind = $4, color = $5, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.name.trim())
    .bind(body.kind)
    .bind(&body.color)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/finance/categories/:id - refused while transactions still
/// reference the category
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    let (in_use,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM transactions WHERE category_id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(auth.user_id)
    .fetch_one(&pool)
    .await?;
    if in_use > 0 {
        return Err(ApiError::conflict(
            "Category is still used by transactions",
        ));
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Category not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}
