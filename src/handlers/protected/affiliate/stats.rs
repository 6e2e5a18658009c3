use axum::Extension;

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::stats_service::{self, AffiliateStats};

/// GET /api/affiliate/stats - dashboard totals and per-platform breakdown
pub async fn get(Extension(auth): Extension<AuthUser>) -> ApiResult<AffiliateStats> {
    let pool = DatabaseManager::pool().await?;
    let stats = stats_service::affiliate_stats(&pool, auth.user_id).await?;
    Ok(ApiResponse::success(stats))
}
