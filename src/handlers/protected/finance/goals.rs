use axum::{extract::Path, response::Json, Extension};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Goal;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct GoalBody {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ContributeBody {
    pub amount: Decimal,
}

/// GET /api/finance/goals
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<Goal>> {
    let pool = DatabaseManager::pool().await?;
    let goals = sqlx::query_as::<_, Goal>(
        "SELECT * FROM goals WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(goals))
}

/// POST /api/finance/goals
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<GoalBody>,
) -> ApiResult<Goal> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Goal name is required"));
    }
    if body.target_amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Target amount must be positive"));
    }
    let pool = DatabaseManager::pool().await?;
    let goal = sqlx::query_as::<_, Goal>(
        "INSERT INTO goals (id, user_id, name, target_amount, saved_amount, deadline)
         VALUES ($1, $2, $3, $4, 0, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.name.trim())
    .bind(body.target_amount)
    .bind(body.deadline)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(goal))
}

/// PUT /api/finance/goals/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<GoalBody>,
) -> ApiResult<Goal> {
    let pool = DatabaseManager::pool().await?;
    let goal = sqlx::query_as::<_, Goal>(
        "UPDATE goals SET name = $3, target_amount = $4, deadline = $5, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.name.trim())
    .bind(body.target_amount)
    .bind(body.deadline)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Goal not found"))?;
    Ok(ApiResponse::success(goal))
}

/// POST /api/finance/goals/:id/contribute - add to the saved amount
pub async fn contribute(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ContributeBody>,
) -> ApiResult<Goal> {
    if body.amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Contribution must be positive"));
    }
    let pool = DatabaseManager::pool().await?;
    let goal = sqlx::query_as::<_, Goal>(
        "UPDATE goals SET saved_amount = saved_amount + $3, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.amount)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Goal not found"))?;
    Ok(ApiResponse::success(goal))
}

/// DELETE /api/finance/goals/:id
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Goal not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}
