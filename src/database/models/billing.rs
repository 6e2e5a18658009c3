use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A client engagement billed by the hour.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingProject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client: String,
    pub name: String,
    pub hourly_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One logged block of work on a billing project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingEntry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub work_date: NaiveDate,
    pub hours: Decimal,
    pub note: Option<String>,
    pub billed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
