use axum::{extract::Path, response::Json, Extension};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Task, TaskStatus};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::assert_board_owner;

#[derive(Debug, Deserialize)]
pub struct TaskBody {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
    pub status: TaskStatus,
    pub position: i32,
}

/// GET /api/todo/boards/:board_id/tasks - column order, then card order
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Vec<Task>> {
    let pool = DatabaseManager::pool().await?;
    assert_board_owner(&pool, auth.user_id, board_id).await?;

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE board_id = $1 ORDER BY status, position",
    )
    .bind(board_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(tasks))
}

/// POST /api/todo/boards/:board_id/tasks - appended to the end of its column
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Path(board_id): Path<Uuid>,
    Json(body): Json<TaskBody>,
) -> ApiResult<Task> {
    if body.title.trim().is_empty() {
        return Err(ApiError::bad_request("Task title is required"));
    }
    let pool = DatabaseManager::pool().await?;
    assert_board_owner(&pool, auth.user_id, board_id).await?;

    let status = body.status.unwrap_or(TaskStatus::Todo);
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, board_id, title, description, status, position, due_date)
         VALUES ($1, $2, $3, $4, $5,
                 COALESCE((SELECT MAX(position) + 1 FROM tasks WHERE board_id = $2 AND status = $5), 0),
                 $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(board_id)
    .bind(body.title.trim())
    .bind(&body.description)
    .bind(status)
    .bind(body.due_date)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(task))
}

/// PUT /api/todo/tasks/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<TaskBody>,
) -> ApiResult<Task> {
    let pool = DatabaseManager::pool().await?;
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks t
         SET title = $3, description = $4, status = COALESCE($5, t.status),
             due_date = $6, updated_at = now()
         FROM boards b
         WHERE t.id = $1 AND t.board_id = b.id AND b.user_id = $2
         RETURNING t.*",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.title.trim())
    .bind(&body.description)
    .bind(body.status)
    .bind(body.due_date)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(ApiResponse::success(task))
}

/// PUT /api/todo/tasks/:id/move - drag a card to a column/slot
pub async fn move_task(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<MoveBody>,
) -> ApiResult<Task> {
    let pool = DatabaseManager::pool().await?;
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks t
         SET status = $3, position = $4, updated_at = now()
         FROM boards b
         WHERE t.id = $1 AND t.board_id = b.id AND b.user_id = $2
         RETURNING t.*",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.status)
    .bind(body.position)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/todo/tasks/:id
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query(
        "DELETE FROM tasks t USING boards b
         WHERE t.id = $1 AND t.board_id = b.id AND b.user_id = $2",
    )
    .bind(id)
    .bind(auth.user_id)
    .execute(&pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}
