use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "txn_kind", rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
}

/// Where a transaction came from: entered by hand, mirrored from the
/// affiliate tracker, or materialized from a recurring schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "txn_source", rename_all = "lowercase")]
pub enum TxnSource {
    Manual,
    #[serde(rename = "affiliatehq")]
    #[sqlx(rename = "affiliatehq")]
    AffiliateHq,
    Recurring,
}

/// A financial tracker transaction. `external_id` back-points to the
/// affiliate Sale/Expense this row mirrors, when `source` is `affiliatehq`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub txn_date: NaiveDate,
    pub category_id: Uuid,
    pub source: TxnSource,
    pub external_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
