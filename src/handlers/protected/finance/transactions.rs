use axum::{
    extract::{Path, Query},
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Transaction, TxnKind, TxnSource};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::sync::{PgSyncStore, SyncService};

#[derive(Debug, Deserialize)]
pub struct TransactionBody {
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub txn_date: NaiveDate,
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub kind: Option<TxnKind>,
    pub category_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/finance/transactions
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<TransactionsQuery>,
) -> ApiResult<Vec<Transaction>> {
    let pool = DatabaseManager::pool().await?;
    let transactions = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions
         WHERE user_id = $1
           AND ($2::txn_kind IS NULL OR kind = $2)
           AND ($3::uuid IS NULL OR category_id = $3)
           AND ($4::date IS NULL OR txn_date >= $4)
           AND ($5::date IS NULL OR txn_date <= $5)
         ORDER BY txn_date DESC, created_at DESC",
    )
    .bind(auth.user_id)
    .bind(query.kind)
    .bind(query.category_id)
    .bind(query.from)
    .bind(query.to)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(transactions))
}

/// POST /api/finance/transactions - manual entry, never linked at creation
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<Transaction> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;
    ensure_category(&pool, auth.user_id, body.category_id).await?;

    let txn = sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions
           (id, user_id, description, amount, kind, txn_date, category_id, source)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.description.trim())
    .bind(body.amount)
    .bind(body.kind)
    .bind(body.txn_date)
    .bind(body.category_id)
    .bind(TxnSource::Manual)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(txn))
}

/// PUT /api/finance/transactions/:id - update, then push amount/date back
/// onto a linked affiliate record. The push only happens for transactions
/// that are not themselves mirrors (source != affiliatehq) and is
/// best-effort: the linked record may be gone.
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<Transaction> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;
    ensure_category(&pool, auth.user_id, body.category_id).await?;

    let txn = sqlx::query_as::<_, Transaction>(
        "UPDATE transactions
         SET description = $3, amount = $4, kind = $5, txn_date = $6, category_id = $7,
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.description.trim())
    .bind(body.amount)
    .bind(body.kind)
    .bind(body.txn_date)
    .bind(body.category_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Transaction not found"))?;

    SyncService::new(PgSyncStore::new(pool.clone()))
        .push_transaction_fields(&txn)
        .await;

    Ok(ApiResponse::success(txn))
}

/// DELETE /api/finance/transactions/:id
///
/// If the deleted transaction was itself a mirror (source == affiliatehq),
/// the originating sale/expense is removed too. Manual transactions never
/// trigger affiliate-side deletes, whatever their external_id says.
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    let txn = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Transaction not found"))?;

    sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if txn.source == TxnSource::AffiliateHq {
        if let Some(affiliate_id) = txn.external_id {
            SyncService::new(PgSyncStore::new(pool.clone()))
                .delete_synced_affiliate_entry(affiliate_id, txn.kind)
                .await;
        }
    }

    Ok(ApiResponse::<()>::no_content())
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    category_id: Uuid,
) -> Result<(), ApiError> {
    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if exists.is_none() {
        return Err(ApiError::bad_request("Unknown category"));
    }
    Ok(())
}

fn validate(body: &TransactionBody) -> Result<(), ApiError> {
    if body.description.trim().is_empty() {
        return Err(ApiError::bad_request("Description is required"));
    }
    if body.amount < Decimal::ZERO {
        return Err(ApiError::bad_request("Amount cannot be negative"));
    }
    Ok(())
}
