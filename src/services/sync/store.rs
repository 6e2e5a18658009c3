use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    Category, Frequency, RecurringTransaction, Transaction, TxnKind, TxnSource,
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("sync store error: {0}")]
    Store(String),
}

/// Fields written when a new mirror transaction is created for an
/// affiliate sale or one-time expense.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub txn_date: NaiveDate,
    pub category_id: Uuid,
    pub source: TxnSource,
    pub external_id: Option<Uuid>,
}

/// Same as [`NewTransaction`] but for recurring mirrors, which carry a
/// schedule instead of a single date.
#[derive(Debug, Clone)]
pub struct NewRecurringTransaction {
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category_id: Uuid,
    pub source: TxnSource,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    pub external_id: Option<Uuid>,
}

/// In-place update applied to an already-linked mirror.
#[derive(Debug, Clone)]
pub struct MirrorUpdate {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Uuid,
}

/// Storage operations the sync engine needs.
///
/// All update/delete operations return `Ok(false)` when the target row does
/// not exist: the link pairing is convention-only (no foreign key), so a
/// dangling pointer is an expected state, not an error. The Postgres
/// implementation backs the server; tests drive the engine against an
/// in-memory implementation.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Idempotent get-or-create by unique (user, name) key. Safe under
    /// concurrent first use: backed by a unique constraint, not a cache.
    async fn category_get_or_create(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TxnKind,
        color: &str,
    ) -> Result<Category, SyncError>;

    async fn transaction_insert(&self, new: NewTransaction) -> Result<Transaction, SyncError>;
    async fn transaction_update(&self, id: Uuid, update: MirrorUpdate) -> Result<bool, SyncError>;
    async fn transaction_delete(&self, id: Uuid) -> Result<bool, SyncError>;

    async fn recurring_insert(
        &self,
        new: NewRecurringTransaction,
    ) -> Result<RecurringTransaction, SyncError>;
    async fn recurring_update(
        &self,
        id: Uuid,
        update: MirrorUpdate,
        frequency: Frequency,
    ) -> Result<bool, SyncError>;
    async fn recurring_delete(&self, id: Uuid) -> Result<bool, SyncError>;

    /// Write (or clear) the mirror pointer on a sale.
    async fn sale_set_link(&self, sale_id: Uuid, external_id: Option<Uuid>)
        -> Result<bool, SyncError>;
    /// Reverse field sync: push amount/date onto a linked sale.
    async fn sale_write_back(
        &self,
        sale_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, SyncError>;
    async fn sale_delete(&self, sale_id: Uuid) -> Result<bool, SyncError>;

    async fn expense_set_link(
        &self,
        expense_id: Uuid,
        external_id: Option<Uuid>,
    ) -> Result<bool, SyncError>;
    async fn expense_write_back(
        &self,
        expense_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, SyncError>;
    async fn expense_delete(&self, expense_id: Uuid) -> Result<bool, SyncError>;
}
