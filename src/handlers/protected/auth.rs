// /api/auth/* - account endpoints for authenticated users
use axum::Extension;

use crate::database::models::User;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - Return the authenticated user's profile
pub async fn whoami(Extension(auth): Extension<AuthUser>) -> ApiResult<User> {
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth.user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User no longer exists"))?;

    Ok(ApiResponse::success(user))
}

/// GET /api/auth/users - List all accounts (admin only)
pub async fn users_list(Extension(auth): Extension<AuthUser>) -> ApiResult<Vec<User>> {
    auth.require_admin()?;
    let pool = DatabaseManager::pool().await?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(users))
}
