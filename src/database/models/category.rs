use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::transaction::TxnKind;

/// A financial tracker category. Names are unique per user; the shared
/// "Affiliate Sales" / "Affiliate Expenses" rows are created lazily on
/// first sync and reused for every mirrored entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: TxnKind,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
