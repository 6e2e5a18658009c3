// /api/billing/* - hourly projects, work entries and billing sheets
pub mod entries;
pub mod projects;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::BillingProject;
use crate::error::ApiError;

pub async fn fetch_owned_project(
    pool: &PgPool,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<BillingProject, ApiError> {
    sqlx::query_as::<_, BillingProject>(
        "SELECT * FROM billing_projects WHERE id = $1 AND user_id = $2",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Billing project not found"))
}
