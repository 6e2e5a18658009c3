use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Category, Frequency, RecurringTransaction, Transaction, TxnKind};

use super::store::{
    MirrorUpdate, NewRecurringTransaction, NewTransaction, SyncError, SyncStore,
};

/// Postgres-backed [`SyncStore`].
pub struct PgSyncStore {
    pool: PgPool,
}

impl PgSyncStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStore for PgSyncStore {
    async fn category_get_or_create(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TxnKind,
        color: &str,
    ) -> Result<Category, SyncError> {
        // Insert-then-select keyed on the (user_id, name) unique constraint,
        // so concurrent first syncs converge on one row.
        sqlx::query(
            "INSERT INTO categories (id, user_id, name, kind, color)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(kind)
        .bind(color)
        .execute(&self.pool)
        .await?;

        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn transaction_insert(&self, new: NewTransaction) -> Result<Transaction, SyncError> {
        let txn = sqlx::query_as::<_, Transaction>(
            "INSERT INTO transactions
               (id, user_id, description, amount, kind, txn_date, category_id, source, external_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.description)
        .bind(new.amount)
        .bind(new.kind)
        .bind(new.txn_date)
        .bind(new.category_id)
        .bind(new.source)
        .bind(new.external_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(txn)
    }

    async fn transaction_update(&self, id: Uuid, update: MirrorUpdate) -> Result<bool, SyncError> {
        let result = sqlx::query(
            "UPDATE transactions
             SET description = $2, amount = $3, txn_date = $4, category_id = $5, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.description)
        .bind(update.amount)
        .bind(update.date)
        .bind(update.category_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn transaction_delete(&self, id: Uuid) -> Result<bool, SyncError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn recurring_insert(
        &self,
        new: NewRecurringTransaction,
    ) -> Result<RecurringTransaction, SyncError> {
        let recurring = sqlx::query_as::<_, RecurringTransaction>(
            "INSERT INTO recurring_transactions
               (id, user_id, description, amount, kind, category_id, source, frequency, next_date, is_active, external_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, true, $10)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.description)
        .bind(new.amount)
        .bind(new.kind)
        .bind(new.category_id)
        .bind(new.source)
        .bind(new.frequency)
        .bind(new.next_date)
        .bind(new.external_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(recurring)
    }

    async fn recurring_update(
        &self,
        id: Uuid,
        update: MirrorUpdate,
        frequency: Frequency,
    ) -> Result<bool, SyncError> {
        let result = sqlx::query(
            "UPDATE recurring_transactions
             SET description = $2, amount = $3, next_date = $4, category_id = $5, frequency = $6,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.description)
        .bind(update.amount)
        .bind(update.date)
        .bind(update.category_id)
        .bind(frequency)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn recurring_delete(&self, id: Uuid) -> Result<bool, SyncError> {
        let result = sqlx::query("DELETE FROM recurring_transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn sale_set_link(
        &self,
        sale_id: Uuid,
        external_id: Option<Uuid>,
    ) -> Result<bool, SyncError> {
        let result = sqlx::query(
            "UPDATE sales SET external_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(sale_id)
        .bind(external_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn sale_write_back(
        &self,
        sale_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, SyncError> {
        let result = sqlx::query(
            "UPDATE sales SET amount = $2, sale_date = $3, updated_at = now() WHERE id = $1",
        )
        .bind(sale_id)
        .bind(amount)
        .bind(date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn sale_delete(&self, sale_id: Uuid) -> Result<bool, SyncError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn expense_set_link(
        &self,
        expense_id: Uuid,
        external_id: Option<Uuid>,
    ) -> Result<bool, SyncError> {
        let result = sqlx::query(
            "UPDATE expenses SET external_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(expense_id)
        .bind(external_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn expense_write_back(
        &self,
        expense_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, SyncError> {
        let result = sqlx::query(
            "UPDATE expenses SET amount = $2, expense_date = $3, updated_at = now() WHERE id = $1",
        )
        .bind(expense_id)
        .bind(amount)
        .bind(date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn expense_delete(&self, expense_id: Uuid) -> Result<bool, SyncError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(expense_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
