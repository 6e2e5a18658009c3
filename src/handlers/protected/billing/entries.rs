use axum::{extract::Path, response::Json, Extension};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{BillingEntry, BillingProject};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::fetch_owned_project;

#[derive(Debug, Deserialize)]
pub struct EntryBody {
    pub work_date: NaiveDate,
    pub hours: Decimal,
    pub note: Option<String>,
    pub billed: Option<bool>,
}

/// Billing sheet: the project, its entries, and the hour/amount rollup.
#[derive(Debug, Serialize)]
pub struct BillingSheet {
    pub project: BillingProject,
    pub entries: Vec<BillingEntry>,
    pub total_hours: Decimal,
    pub total_amount: Decimal,
    pub unbilled_hours: Decimal,
    pub unbilled_amount: Decimal,
}

/// GET /api/billing/projects/:project_id/entries
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Vec<BillingEntry>> {
    let pool = DatabaseManager::pool().await?;
    fetch_owned_project(&pool, auth.user_id, project_id).await?;

    let entries = sqlx::query_as::<_, BillingEntry>(
        "SELECT * FROM billing_entries WHERE project_id = $1 ORDER BY work_date",
    )
    .bind(project_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/billing/projects/:project_id/entries
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<EntryBody>,
) -> ApiResult<BillingEntry> {
    if body.hours <= Decimal::ZERO {
        return Err(ApiError::bad_request("Hours must be positive"));
    }
    let pool = DatabaseManager::pool().await?;
    fetch_owned_project(&pool, auth.user_id, project_id).await?;

    let entry = sqlx::query_as::<_, BillingEntry>(
        "INSERT INTO billing_entries (id, project_id, work_date, hours, note, billed)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(body.work_date)
    .bind(body.hours)
    .bind(&body.note)
    .bind(body.billed.unwrap_or(false))
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(entry))
}

/// PUT /api/billing/projects/:project_id/entries/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
    Json(body): Json<EntryBody>,
) -> ApiResult<BillingEntry> {
    if body.hours <= Decimal::ZERO {
        return Err(ApiError::bad_request("Hours must be positive"));
    }
    let pool = DatabaseManager::pool().await?;
    fetch_owned_project(&pool, auth.user_id, project_id).await?;

    let entry = sqlx::query_as::<_, BillingEntry>(
        "UPDATE billing_entries
         SET work_date = $3, hours = $4, note = $5, billed = $6, updated_at = now()
         WHERE id = $1 AND project_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(project_id)
    .bind(body.work_date)
    .bind(body.hours)
    .bind(&body.note)
    .bind(body.billed.unwrap_or(false))
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Billing entry not found"))?;
    Ok(ApiResponse::success(entry))
}

/// DELETE /api/billing/projects/:project_id/entries/:id
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    fetch_owned_project(&pool, auth.user_id, project_id).await?;

    let result = sqlx::query("DELETE FROM billing_entries WHERE id = $1 AND project_id = $2")
        .bind(id)
        .bind(project_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Billing entry not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}

/// GET /api/billing/projects/:project_id/sheet
pub async fn sheet(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<BillingSheet> {
    let pool = DatabaseManager::pool().await?;
    let project = fetch_owned_project(&pool, auth.user_id, project_id).await?;

    let entries = sqlx::query_as::<_, BillingEntry>(
        "SELECT * FROM billing_entries WHERE project_id = $1 ORDER BY work_date",
    )
    .bind(project_id)
    .fetch_all(&pool)
    .await?;

    let total_hours: Decimal = entries.iter().map(|e| e.hours).sum();
    let unbilled_hours: Decimal = entries.iter().filter(|e| !e.billed).map(|e| e.hours).sum();

    Ok(ApiResponse::success(BillingSheet {
        total_amount: total_hours * project.hourly_rate,
        unbilled_amount: unbilled_hours * project.hourly_rate,
        total_hours,
        unbilled_hours,
        project,
        entries,
    }))
}
