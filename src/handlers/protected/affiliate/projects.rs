use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Project;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ProjectBody {
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/affiliate/projects
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<Project>> {
    let pool = DatabaseManager::pool().await?;
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/affiliate/projects
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ProjectBody>,
) -> ApiResult<Project> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Project name is required"));
    }
    let pool = DatabaseManager::pool().await?;
    let project = sqlx::query_as::<_, Project>(
        "INSERT INTO projects (id, user_id, name, description)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.name.trim())
    .bind(&body.description)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(project))
}

/// PUT /api/affiliate/projects/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProjectBody>,
) -> ApiResult<Project> {
    let pool = DatabaseManager::pool().await?;
    let project = sqlx::query_as::<_, Project>(
        "UPDATE projects SET name = $3, description = $4, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.name.trim())
    .bind(&body.description)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(ApiResponse::success(project))
}

/// DELETE /api/affiliate/projects/:id - sales/expenses keep their rows,
/// their project_id is nulled by the schema
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Project not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}
