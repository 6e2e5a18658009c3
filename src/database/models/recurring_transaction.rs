use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::expense::Frequency;
use super::transaction::{TxnKind, TxnSource};

/// A scheduled transaction template. Mirrors of recurring affiliate expenses
/// land here instead of in `transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurringTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category_id: Uuid,
    pub source: TxnSource,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    pub is_active: bool,
    pub external_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
