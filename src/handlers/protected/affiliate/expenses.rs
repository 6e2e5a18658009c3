use axum::{
    extract::{Path, Query},
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Expense, ExpenseType, Frequency};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::{project_name, sync_service};

#[derive(Debug, Deserialize)]
pub struct ExpenseBody {
    pub project_id: Option<Uuid>,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub expense_type: ExpenseType,
    pub frequency: Option<Frequency>,
}

#[derive(Debug, Deserialize)]
pub struct ExpensesQuery {
    pub project_id: Option<Uuid>,
    pub expense_type: Option<ExpenseType>,
}

/// GET /api/affiliate/expenses
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ExpensesQuery>,
) -> ApiResult<Vec<Expense>> {
    let pool = DatabaseManager::pool().await?;
    let expenses = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses
         WHERE user_id = $1
           AND ($2::uuid IS NULL OR project_id = $2)
           AND ($3::expense_type IS NULL OR expense_type = $3)
         ORDER BY expense_date DESC, created_at DESC",
    )
    .bind(auth.user_id)
    .bind(query.project_id)
    .bind(query.expense_type)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(expenses))
}

/// POST /api/affiliate/expenses - create, then mirror by type: one-time
/// expenses land in transactions, recurring ones in recurring_transactions.
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ExpenseBody>,
) -> ApiResult<Expense> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;

    let mut expense = sqlx::query_as::<_, Expense>(
        "INSERT INTO expenses
           (id, user_id, project_id, category, description, amount, expense_date, expense_type, frequency)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.project_id)
    .bind(body.category.trim())
    .bind(body.description.trim())
    .bind(body.amount)
    .bind(body.expense_date)
    .bind(body.expense_type)
    .bind(body.frequency)
    .fetch_one(&pool)
    .await?;

    let project = project_name(&pool, auth.user_id, expense.project_id).await?;
    expense.external_id = run_sync(&pool, &expense, project.as_deref()).await?;

    Ok(ApiResponse::created(expense))
}

/// PUT /api/affiliate/expenses/:id
///
/// A type flip (one-time <-> recurring) deletes the old-kind mirror and
/// clears the link before the row is updated, so the new-kind sync path
/// creates a fresh mirror. Not atomic: a crash between the mirror delete
/// and the fresh sync leaves the expense unmirrored until the next save.
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ExpenseBody>,
) -> ApiResult<Expense> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;

    let old = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Expense not found"))?;

    let type_changed = old.expense_type != body.expense_type;
    if type_changed {
        if let Some(mirror_id) = old.external_id {
            // Old mirror kind is chosen by the OLD type
            let sync = sync_service(&pool);
            match old.expense_type {
                ExpenseType::OneTime => sync.delete_synced_transaction(mirror_id).await,
                ExpenseType::Recurring => sync.delete_synced_recurring(mirror_id).await,
            }
        }
    }

    let mut expense = sqlx::query_as::<_, Expense>(
        "UPDATE expenses
         SET project_id = $3, category = $4, description = $5, amount = $6,
             expense_date = $7, expense_type = $8, frequency = $9,
             external_id = CASE WHEN $10 THEN NULL ELSE external_id END,
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.project_id)
    .bind(body.category.trim())
    .bind(body.description.trim())
    .bind(body.amount)
    .bind(body.expense_date)
    .bind(body.expense_type)
    .bind(body.frequency)
    .bind(type_changed)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Expense not found"))?;

    let project = project_name(&pool, auth.user_id, expense.project_id).await?;
    if let Some(link) = run_sync(&pool, &expense, project.as_deref()).await? {
        expense.external_id = Some(link);
    }

    Ok(ApiResponse::success(expense))
}

/// DELETE /api/affiliate/expenses/:id - the mirror kind is chosen by the
/// expense type captured just before the row is deleted.
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    let expense: Option<(Option<Uuid>, ExpenseType)> = sqlx::query_as(
        "SELECT external_id, expense_type FROM expenses WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?;
    let Some((external_id, expense_type)) = expense else {
        return Err(ApiError::not_found("Expense not found"));
    };

    sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if let Some(mirror_id) = external_id {
        let sync = sync_service(&pool);
        match expense_type {
            ExpenseType::OneTime => sync.delete_synced_transaction(mirror_id).await,
            ExpenseType::Recurring => sync.delete_synced_recurring(mirror_id).await,
        }
    }

    Ok(ApiResponse::<()>::no_content())
}

/// Run the sync path chosen by the expense's (current) type. Returns the
/// fresh mirror id when one was created.
async fn run_sync(
    pool: &sqlx::PgPool,
    expense: &Expense,
    project: Option<&str>,
) -> Result<Option<Uuid>, ApiError> {
    let sync = sync_service(pool);
    let created = match expense.expense_type {
        ExpenseType::OneTime => sync.sync_expense(expense, project).await?.map(|t| t.id),
        ExpenseType::Recurring => sync
            .sync_expense_recurring(expense, project)
            .await?
            .map(|r| r.id),
    };
    Ok(created.or(expense.external_id))
}

fn validate(body: &ExpenseBody) -> Result<(), ApiError> {
    if body.category.trim().is_empty() {
        return Err(ApiError::bad_request("Category is required"));
    }
    if body.description.trim().is_empty() {
        return Err(ApiError::bad_request("Description is required"));
    }
    if body.amount < Decimal::ZERO {
        return Err(ApiError::bad_request("Amount cannot be negative"));
    }
    if body.expense_type == ExpenseType::Recurring && body.frequency.is_none() {
        return Err(ApiError::bad_request(
            "Recurring expenses require a frequency",
        ));
    }
    Ok(())
}
