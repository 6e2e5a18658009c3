use axum::Extension;

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::stats_service::{self, FinanceStats};

/// GET /api/finance/stats - income/expense totals and per-category spend
pub async fn get(Extension(auth): Extension<AuthUser>) -> ApiResult<FinanceStats> {
    let pool = DatabaseManager::pool().await?;
    let stats = stats_service::finance_stats(&pool, auth.user_id).await?;
    Ok(ApiResponse::success(stats))
}
