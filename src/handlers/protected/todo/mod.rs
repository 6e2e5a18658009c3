// /api/todo/* - kanban boards and tasks
pub mod boards;
pub mod tasks;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Boards are user-owned; tasks hang off boards. Every task operation goes
/// through this ownership check.
pub async fn assert_board_owner(
    pool: &PgPool,
    user_id: Uuid,
    board_id: Uuid,
) -> Result<(), ApiError> {
    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM boards WHERE id = $1 AND user_id = $2")
            .bind(board_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if exists.is_none() {
        return Err(ApiError::not_found("Board not found"));
    }
    Ok(())
}
