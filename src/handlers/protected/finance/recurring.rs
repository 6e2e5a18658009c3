use axum::{extract::Path, response::Json, Extension};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Frequency, RecurringTransaction, TxnKind, TxnSource};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct RecurringBody {
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category_id: Uuid,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    pub is_active: Option<bool>,
}

/// GET /api/finance/recurring
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<RecurringTransaction>> {
    let pool = DatabaseManager::pool().await?;
    let recurring = sqlx::query_as::<_, RecurringTransaction>(
        "SELECT * FROM recurring_transactions WHERE user_id = $1 ORDER BY next_date",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(recurring))
}

/// POST /api/finance/recurring
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<RecurringBody>,
) -> ApiResult<RecurringTransaction> {
    if body.description.trim().is_empty() {
        return Err(ApiError::bad_request("Description is required"));
    }
    let pool = DatabaseManager::pool().await?;

    let recurring = sqlx::query_as::<_, RecurringTransaction>(
        "INSERT INTO recurring_transactions
           (id, user_id, description, amount, kind, category_id, source, frequency, next_date, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.description.trim())
    .bind(body.amount)
    .bind(body.kind)
    .bind(body.category_id)
    .bind(TxnSource::Recurring)
    .bind(body.frequency)
    .bind(body.next_date)
    .bind(body.is_active.unwrap_or(true))
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(recurring))
}

/// PUT /api/finance/recurring/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecurringBody>,
) -> ApiResult<RecurringTransaction> {
    let pool = DatabaseManager::pool().await?;
    let recurring = sqlx::query_as::<_, RecurringTransaction>(
        "UPDATE recurring_transactions
         SET description = $3, amount = $4, kind = $5, category_id = $6, frequency = $7,
             next_date = $8, is_active = $9, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.description.trim())
    .bind(body.amount)
    .bind(body.kind)
    .bind(body.category_id)
    .bind(body.frequency)
    .bind(body.next_date)
    .bind(body.is_active.unwrap_or(true))
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Recurring transaction not found"))?;
    Ok(ApiResponse::success(recurring))
}

/// DELETE /api/finance/recurring/:id
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result =
        sqlx::query("DELETE FROM recurring_transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(auth.user_id)
            .execute(&pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Recurring transaction not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}
