use axum::{extract::Path, response::Json, Extension};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::BillingProject;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct BillingProjectBody {
    pub client: String,
    pub name: String,
    pub hourly_rate: Decimal,
}

/// GET /api/billing/projects
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<BillingProject>> {
    let pool = DatabaseManager::pool().await?;
    let projects = sqlx::query_as::<_, BillingProject>(
        "SELECT * FROM billing_projects WHERE user_id = $1 ORDER BY client, name",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/billing/projects
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BillingProjectBody>,
) -> ApiResult<BillingProject> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;
    let project = sqlx::query_as::<_, BillingProject>(
        "INSERT INTO billing_projects (id, user_id, client, name, hourly_rate)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.client.trim())
    .bind(body.name.trim())
    .bind(body.hourly_rate)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(project))
}

/// PUT /api/billing/projects/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<BillingProjectBody>,
) -> ApiResult<BillingProject> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;
    let project = sqlx::query_as::<_, BillingProject>(
        "UPDATE billing_projects
         SET client = $3, name = $4, hourly_rate = $5, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.client.trim())
    .bind(body.name.trim())
    .bind(body.hourly_rate)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Billing project not found"))?;
    Ok(ApiResponse::success(project))
}

/// DELETE /api/billing/projects/:id - entries cascade in the schema
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM billing_projects WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Billing project not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}

fn validate(body: &BillingProjectBody) -> Result<(), ApiError> {
    if body.client.trim().is_empty() || body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Client and project name are required"));
    }
    if body.hourly_rate < Decimal::ZERO {
        return Err(ApiError::bad_request("Hourly rate cannot be negative"));
    }
    Ok(())
}
