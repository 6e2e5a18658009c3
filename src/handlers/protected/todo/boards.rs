use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Board;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct BoardBody {
    pub name: String,
}

/// GET /api/todo/boards
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<Board>> {
    let pool = DatabaseManager::pool().await?;
    let boards = sqlx::query_as::<_, Board>(
        "SELECT * FROM boards WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(boards))
}

/// POST /api/todo/boards
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BoardBody>,
) -> ApiResult<Board> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Board name is required"));
    }
    let pool = DatabaseManager::pool().await?;
    let board = sqlx::query_as::<_, Board>(
        "INSERT INTO boards (id, user_id, name) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.name.trim())
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(board))
}

/// PUT /api/todo/boards/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<BoardBody>,
) -> ApiResult<Board> {
    let pool = DatabaseManager::pool().await?;
    let board = sqlx::query_as::<_, Board>(
        "UPDATE boards SET name = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.name.trim())
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Board not found"))?;
    Ok(ApiResponse::success(board))
}

/// DELETE /api/todo/boards/:id - tasks cascade in the schema
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Board not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}
