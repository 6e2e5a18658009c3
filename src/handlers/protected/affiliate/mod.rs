// /api/affiliate/* - sales, expenses and projects with finance-side sync
pub mod expenses;
pub mod projects;
pub mod sales;
pub mod stats;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::sync::{PgSyncStore, SyncService};

/// Sync service wired to the live database.
pub fn sync_service(pool: &PgPool) -> SyncService<PgSyncStore> {
    SyncService::new(PgSyncStore::new(pool.clone()))
}

/// Look up the project name used in mirror descriptions. A dangling
/// project_id just means no project context, not an error.
pub async fn project_name(
    pool: &PgPool,
    user_id: Uuid,
    project_id: Option<Uuid>,
) -> Result<Option<String>, ApiError> {
    let Some(project_id) = project_id else {
        return Ok(None);
    };
    let name: Option<(String,)> =
        sqlx::query_as("SELECT name FROM projects WHERE id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(name.map(|(n,)| n))
}
