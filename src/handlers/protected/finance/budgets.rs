use axum::{extract::Path, response::Json, Extension};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::models::Budget;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct BudgetBody {
    pub category_id: Uuid,
    pub month: NaiveDate,
    pub amount: Decimal,
}

/// Budget row plus how much of it has been spent so far.
#[derive(Debug, Serialize, FromRow)]
pub struct BudgetProgress {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: Decimal,
}

/// GET /api/finance/budgets - budgets with month-to-date spend per category
pub async fn list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<BudgetProgress>> {
    let pool = DatabaseManager::pool().await?;
    let budgets = sqlx::query_as::<_, BudgetProgress>(
        "SELECT b.*,
                COALESCE((SELECT SUM(t.amount) FROM transactions t
                          WHERE t.user_id = b.user_id
                            AND t.category_id = b.category_id
                            AND t.kind = 'expense'
                            AND date_trunc('month', t.txn_date::timestamp) = date_trunc('month', b.month::timestamp)), 0) AS spent
         FROM budgets b
         WHERE b.user_id = $1
         ORDER BY b.month DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(budgets))
}

/// POST /api/finance/budgets - one budget per category per month
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<Budget> {
    let month = first_of_month(body.month);
    let pool = DatabaseManager::pool().await?;

    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM budgets WHERE user_id = $1 AND category_id = $2 AND month = $3",
    )
    .bind(auth.user_id)
    .bind(body.category_id)
    .bind(month)
    .fetch_optional(&pool)
    .await?;
    if existing.is_some() {
        return Err(ApiError::conflict(
            "A budget for this category and month already exists",
        ));
    }

    let budget = sqlx::query_as::<_, Budget>(
        "INSERT INTO budgets (id, user_id, category_id, month, amount)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.category_id)
    .bind(month)
    .bind(body.amount)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(budget))
}

/// PUT /api/finance/budgets/:id
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<Budget> {
    let pool = DatabaseManager::pool().await?;
    let budget = sqlx::query_as::<_, Budget>(
        "UPDATE budgets SET category_id = $3, month = $4, amount = $5, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.category_id)
    .bind(first_of_month(body.month))
    .bind(body.amount)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Budget not found"))?;
    Ok(ApiResponse::success(budget))
}

/// DELETE /api/finance/budgets/:id
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Budget not found"));
    }
    Ok(ApiResponse::<()>::no_content())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
