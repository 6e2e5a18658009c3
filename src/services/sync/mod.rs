//! Bidirectional sync between the affiliate tracker and the financial
//! tracker.
//!
//! Sales and expenses created on the affiliate side are mirrored into
//! transactions (or recurring transactions, for recurring expenses) in the
//! finance module, linked by a mutual `external_id` pointer pair. Deletes
//! and field edits propagate in both directions. Every call here is
//! best-effort from the caller's point of view: it runs after the primary
//! write has committed, a missing mirror is treated as already consistent,
//! and nothing is rolled back on failure.

pub mod pg_store;
pub mod store;

pub use pg_store::PgSyncStore;
pub use store::{
    MirrorUpdate, NewRecurringTransaction, NewTransaction, SyncError, SyncStore,
};

use tracing::warn;
use uuid::Uuid;

use crate::database::models::{
    Expense, RecurringTransaction, Sale, Transaction, TxnKind, TxnSource,
};

/// Landing category for mirrored sales, lazily created on first sync.
pub const AFFILIATE_SALES_CATEGORY: &str = "Affiliate Sales";
/// Landing category for mirrored expenses, lazily created on first sync.
pub const AFFILIATE_EXPENSES_CATEGORY: &str = "Affiliate Expenses";

const SALES_CATEGORY_COLOR: &str = "#22c55e";
const EXPENSES_CATEGORY_COLOR: &str = "#ef4444";

/// Mirror description for a sale: "{platform} - {project}" when the sale
/// belongs to a project, "{platform} Sale" otherwise.
pub fn sale_description(platform: &str, project_name: Option<&str>) -> String {
    match project_name {
        Some(project) => format!("{} - {}", platform, project),
        None => format!("{} Sale", platform),
    }
}

/// Mirror description for an expense: "{description} ({category})" with an
/// optional " - {project}" suffix.
pub fn expense_description(
    description: &str,
    category: &str,
    project_name: Option<&str>,
) -> String {
    match project_name {
        Some(project) => format!("{} ({}) - {}", description, category, project),
        None => format!("{} ({})", description, category),
    }
}

pub struct SyncService<S> {
    store: S,
}

impl<S: SyncStore> SyncService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mirror a sale into the financial tracker.
    ///
    /// Linked sales get an in-place mirror update and return `None`.
    /// Unlinked sales get a fresh income transaction with
    /// `source=affiliatehq`; the new mirror id is written back onto the
    /// sale and the created transaction is returned.
    pub async fn sync_sale(
        &self,
        sale: &Sale,
        project_name: Option<&str>,
    ) -> Result<Option<Transaction>, SyncError> {
        let description = sale_description(&sale.platform, project_name);
        let category = self
            .store
            .category_get_or_create(
                sale.user_id,
                AFFILIATE_SALES_CATEGORY,
                TxnKind::Income,
                SALES_CATEGORY_COLOR,
            )
            .await?;

        if let Some(txn_id) = sale.external_id {
            let updated = self
                .store
                .transaction_update(
                    txn_id,
                    MirrorUpdate {
                        description,
                        amount: sale.amount,
                        date: sale.sale_date,
                        category_id: category.id,
                    },
                )
                .await?;
            if !updated {
                warn!(sale_id = %sale.id, mirror_id = %txn_id, "sale mirror missing; link is stale");
            }
            return Ok(None);
        }

        let txn = self
            .store
            .transaction_insert(NewTransaction {
                user_id: sale.user_id,
                description,
                amount: sale.amount,
                kind: TxnKind::Income,
                txn_date: sale.sale_date,
                category_id: category.id,
                source: TxnSource::AffiliateHq,
                external_id: Some(sale.id),
            })
            .await?;

        if !self.store.sale_set_link(sale.id, Some(txn.id)).await? {
            warn!(sale_id = %sale.id, "sale vanished before link write-back");
        }
        Ok(Some(txn))
    }

    /// Mirror a one-time expense into an expense transaction.
    pub async fn sync_expense(
        &self,
        expense: &Expense,
        project_name: Option<&str>,
    ) -> Result<Option<Transaction>, SyncError> {
        let description = expense_description(&expense.description, &expense.category, project_name);
        let category = self
            .store
            .category_get_or_create(
                expense.user_id,
                AFFILIATE_EXPENSES_CATEGORY,
                TxnKind::Expense,
                EXPENSES_CATEGORY_COLOR,
            )
            .await?;

        if let Some(txn_id) = expense.external_id {
            let updated = self
                .store
                .transaction_update(
                    txn_id,
                    MirrorUpdate {
                        description,
                        amount: expense.amount,
                        date: expense.expense_date,
                        category_id: category.id,
                    },
                )
                .await?;
            if !updated {
                warn!(expense_id = %expense.id, mirror_id = %txn_id, "expense mirror missing; link is stale");
            }
            return Ok(None);
        }

        let txn = self
            .store
            .transaction_insert(NewTransaction {
                user_id: expense.user_id,
                description,
                amount: expense.amount,
                kind: TxnKind::Expense,
                txn_date: expense.expense_date,
                category_id: category.id,
                source: TxnSource::AffiliateHq,
                external_id: Some(expense.id),
            })
            .await?;

        if !self.store.expense_set_link(expense.id, Some(txn.id)).await? {
            warn!(expense_id = %expense.id, "expense vanished before link write-back");
        }
        Ok(Some(txn))
    }

    /// Mirror a recurring expense into a recurring transaction. The same
    /// linking discipline as [`sync_expense`], against the recurring table.
    ///
    /// [`sync_expense`]: SyncService::sync_expense
    pub async fn sync_expense_recurring(
        &self,
        expense: &Expense,
        project_name: Option<&str>,
    ) -> Result<Option<RecurringTransaction>, SyncError> {
        let frequency = expense.frequency.ok_or_else(|| {
            SyncError::Store(format!("recurring expense {} has no frequency", expense.id))
        })?;
        let description = expense_description(&expense.description, &expense.category, project_name);
        let category = self
            .store
            .category_get_or_create(
                expense.user_id,
                AFFILIATE_EXPENSES_CATEGORY,
                TxnKind::Expense,
                EXPENSES_CATEGORY_COLOR,
            )
            .await?;

        if let Some(recurring_id) = expense.external_id {
            let updated = self
                .store
                .recurring_update(
                    recurring_id,
                    MirrorUpdate {
                        description,
                        amount: expense.amount,
                        date: expense.expense_date,
                        category_id: category.id,
                    },
                    frequency,
                )
                .await?;
            if !updated {
                warn!(expense_id = %expense.id, mirror_id = %recurring_id, "recurring mirror missing; link is stale");
            }
            return Ok(None);
        }

        let recurring = self
            .store
            .recurring_insert(NewRecurringTransaction {
                user_id: expense.user_id,
                description,
                amount: expense.amount,
                kind: TxnKind::Expense,
                category_id: category.id,
                source: TxnSource::AffiliateHq,
                frequency,
                next_date: expense.expense_date,
                external_id: Some(expense.id),
            })
            .await?;

        if !self
            .store
            .expense_set_link(expense.id, Some(recurring.id))
            .await?
        {
            warn!(expense_id = %expense.id, "expense vanished before link write-back");
        }
        Ok(Some(recurring))
    }

    /// Best-effort delete of a mirror transaction. The entry may already be
    /// gone; every failure is swallowed.
    pub async fn delete_synced_transaction(&self, mirror_id: Uuid) {
        match self.store.transaction_delete(mirror_id).await {
            Ok(_) => {}
            Err(e) => warn!(%mirror_id, error = %e, "failed to delete mirror transaction"),
        }
    }

    /// Best-effort delete of a recurring mirror.
    pub async fn delete_synced_recurring(&self, mirror_id: Uuid) {
        match self.store.recurring_delete(mirror_id).await {
            Ok(_) => {}
            Err(e) => warn!(%mirror_id, error = %e, "failed to delete recurring mirror"),
        }
    }

    /// Reverse delete: remove the affiliate record a mirror transaction was
    /// created from. Callers must only invoke this for transactions whose
    /// `source` is `affiliatehq`; the kind picks the affiliate table.
    pub async fn delete_synced_affiliate_entry(&self, affiliate_id: Uuid, kind: TxnKind) {
        let result = match kind {
            TxnKind::Income => self.store.sale_delete(affiliate_id).await,
            TxnKind::Expense => self.store.expense_delete(affiliate_id).await,
        };
        if let Err(e) = result {
            warn!(%affiliate_id, error = %e, "failed to delete affiliate entry for mirror");
        }
    }

    /// Reverse field sync: when a non-affiliate transaction carrying an
    /// `external_id` is edited, push its amount/date back onto the linked
    /// sale or expense. Never creates affiliate rows (no project context is
    /// available here); failures are swallowed.
    pub async fn push_transaction_fields(&self, txn: &Transaction) {
        if txn.source == TxnSource::AffiliateHq {
            return;
        }
        let Some(affiliate_id) = txn.external_id else {
            return;
        };

        let result = match txn.kind {
            TxnKind::Income => {
                self.store
                    .sale_write_back(affiliate_id, txn.amount, txn.txn_date)
                    .await
            }
            TxnKind::Expense => {
                self.store
                    .expense_write_back(affiliate_id, txn.amount, txn.txn_date)
                    .await
            }
        };
        if let Err(e) = result {
            warn!(txn_id = %txn.id, %affiliate_id, error = %e, "reverse field sync failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_description_with_project() {
        assert_eq!(
            sale_description("ClickBank", Some("My Blog")),
            "ClickBank - My Blog"
        );
    }

    #[test]
    fn sale_description_without_project() {
        assert_eq!(sale_description("ClickBank", None), "ClickBank Sale");
    }

    #[test]
    fn expense_description_variants() {
        assert_eq!(
            expense_description("Hosting", "Infrastructure", None),
            "Hosting (Infrastructure)"
        );
        assert_eq!(
            expense_description("Hosting", "Infrastructure", Some("My Blog")),
            "Hosting (Infrastructure) - My Blog"
        );
    }
}
