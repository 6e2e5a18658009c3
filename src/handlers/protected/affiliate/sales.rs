use axum::{
    extract::{Path, Query},
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Sale;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::{project_name, sync_service};

#[derive(Debug, Deserialize)]
pub struct SaleBody {
    pub project_id: Option<Uuid>,
    pub platform: String,
    pub amount: Decimal,
    pub sale_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    pub project_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/affiliate/sales
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<Vec<Sale>> {
    let pool = DatabaseManager::pool().await?;
    let sales = sqlx::query_as::<_, Sale>(
        "SELECT * FROM sales
         WHERE user_id = $1
           AND ($2::uuid IS NULL OR project_id = $2)
           AND ($3::date IS NULL OR sale_date >= $3)
           AND ($4::date IS NULL OR sale_date <= $4)
         ORDER BY sale_date DESC, created_at DESC",
    )
    .bind(auth.user_id)
    .bind(query.project_id)
    .bind(query.from)
    .bind(query.to)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(sales))
}

/// POST /api/affiliate/sales - create the sale, then mirror it into the
/// financial tracker. The sale row is committed before sync runs; a sync
/// failure surfaces as a 500 but does not roll the sale back.
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SaleBody>,
) -> ApiResult<Sale> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;

    let mut sale = sqlx::query_as::<_, Sale>(
        "INSERT INTO sales (id, user_id, project_id, platform, amount, sale_date)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(body.project_id)
    .bind(body.platform.trim())
    .bind(body.amount)
    .bind(body.sale_date)
    .fetch_one(&pool)
    .await?;

    let project = project_name(&pool, auth.user_id, sale.project_id).await?;
    if let Some(txn) = sync_service(&pool)
        .sync_sale(&sale, project.as_deref())
        .await?
    {
        sale.external_id = Some(txn.id);
    }

    Ok(ApiResponse::created(sale))
}

/// PUT /api/affiliate/sales/:id - update, then refresh the mirror in place
/// (or create it, if the sale was never linked)
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<SaleBody>,
) -> ApiResult<Sale> {
    validate(&body)?;
    let pool = DatabaseManager::pool().await?;

    let mut sale = sqlx::query_as::<_, Sale>(
        "UPDATE sales
         SET project_id = $3, platform = $4, amount = $5, sale_date = $6, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(body.project_id)
    .bind(body.platform.trim())
    .bind(body.amount)
    .bind(body.sale_date)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Sale not found"))?;

    let project = project_name(&pool, auth.user_id, sale.project_id).await?;
    if let Some(txn) = sync_service(&pool)
        .sync_sale(&sale, project.as_deref())
        .await?
    {
        sale.external_id = Some(txn.id);
    }

    Ok(ApiResponse::success(sale))
}

/// DELETE /api/affiliate/sales/:id - capture the mirror link before the row
/// goes away, then best-effort delete the mirror. Unlinked sales skip the
/// mirror lookup entirely.
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    let sale: Option<(Option<Uuid>,)> =
        sqlx::query_as("SELECT external_id FROM sales WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(auth.user_id)
            .fetch_optional(&pool)
            .await?;
    let Some((external_id,)) = sale else {
        return Err(ApiError::not_found("Sale not found"));
    };

    sqlx::query("DELETE FROM sales WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if let Some(mirror_id) = external_id {
        sync_service(&pool).delete_synced_transaction(mirror_id).await;
    }

    Ok(ApiResponse::<()>::no_content())
}

fn validate(body: &SaleBody) -> Result<(), ApiError> {
    if body.platform.trim().is_empty() {
        return Err(ApiError::bad_request("Platform is required"));
    }
    if body.amount < Decimal::ZERO {
        return Err(ApiError::bad_request("Amount cannot be negative"));
    }
    Ok(())
}
