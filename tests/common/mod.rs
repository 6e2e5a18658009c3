// Shared test fixtures: an in-memory SyncStore so the sync engine's
// behavior can be exercised without a database.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use bizdash_api::database::models::{
    Category, Expense, ExpenseType, Frequency, RecurringTransaction, Sale, Transaction, TxnKind,
    TxnSource,
};
use bizdash_api::services::sync::{
    MirrorUpdate, NewRecurringTransaction, NewTransaction, SyncError, SyncStore,
};

#[derive(Default)]
pub struct MemoryStore {
    pub categories: Mutex<Vec<Category>>,
    pub transactions: Mutex<HashMap<Uuid, Transaction>>,
    pub recurring: Mutex<HashMap<Uuid, RecurringTransaction>>,
    pub sales: Mutex<HashMap<Uuid, Sale>>,
    pub expenses: Mutex<HashMap<Uuid, Expense>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_sale(&self, sale: Sale) {
        self.sales.lock().unwrap().insert(sale.id, sale);
    }

    pub fn seed_expense(&self, expense: Expense) {
        self.expenses.lock().unwrap().insert(expense.id, expense);
    }

    pub fn seed_transaction(&self, txn: Transaction) {
        self.transactions.lock().unwrap().insert(txn.id, txn);
    }

    pub fn sale(&self, id: Uuid) -> Option<Sale> {
        self.sales.lock().unwrap().get(&id).cloned()
    }

    pub fn expense(&self, id: Uuid) -> Option<Expense> {
        self.expenses.lock().unwrap().get(&id).cloned()
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().values().cloned().collect()
    }

    pub fn all_recurring(&self) -> Vec<RecurringTransaction> {
        self.recurring.lock().unwrap().values().cloned().collect()
    }

    pub fn category_named(&self, name: &str) -> Option<Category> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn category_get_or_create(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TxnKind,
        color: &str,
    ) -> Result<Category, SyncError> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(existing) = categories
            .iter()
            .find(|c| c.user_id == user_id && c.name == name)
        {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            kind,
            color: color.to_string(),
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn transaction_insert(&self, new: NewTransaction) -> Result<Transaction, SyncError> {
        let now = Utc::now();
        let txn = Transaction {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            description: new.description,
            amount: new.amount,
            kind: new.kind,
            txn_date: new.txn_date,
            category_id: new.category_id,
            source: new.source,
            external_id: new.external_id,
            created_at: now,
            updated_at: now,
        };
        self.transactions.lock().unwrap().insert(txn.id, txn.clone());
        Ok(txn)
    }

    async fn transaction_update(&self, id: Uuid, update: MirrorUpdate) -> Result<bool, SyncError> {
        let mut transactions = self.transactions.lock().unwrap();
        match transactions.get_mut(&id) {
            Some(txn) => {
                txn.description = update.description;
                txn.amount = update.amount;
                txn.txn_date = update.date;
                txn.category_id = update.category_id;
                txn.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transaction_delete(&self, id: Uuid) -> Result<bool, SyncError> {
        Ok(self.transactions.lock().unwrap().remove(&id).is_some())
    }

    async fn recurring_insert(
        &self,
        new: NewRecurringTransaction,
    ) -> Result<RecurringTransaction, SyncError> {
        let now = Utc::now();
        let recurring = RecurringTransaction {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            description: new.description,
            amount: new.amount,
            kind: new.kind,
            category_id: new.category_id,
            source: new.source,
            frequency: new.frequency,
            next_date: new.next_date,
            is_active: true,
            external_id: new.external_id,
            created_at: now,
            updated_at: now,
        };
        self.recurring
            .lock()
            .unwrap()
            .insert(recurring.id, recurring.clone());
        Ok(recurring)
    }

    async fn recurring_update(
        &self,
        id: Uuid,
        update: MirrorUpdate,
        frequency: Frequency,
    ) -> Result<bool, SyncError> {
        let mut recurring = self.recurring.lock().unwrap();
        match recurring.get_mut(&id) {
            Some(rec) => {
                rec.description = update.description;
                rec.amount = update.amount;
                rec.next_date = update.date;
                rec.category_id = update.category_id;
                rec.frequency = frequency;
                rec.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn recurring_delete(&self, id: Uuid) -> Result<bool, SyncError> {
        Ok(self.recurring.lock().unwrap().remove(&id).is_some())
    }

    async fn sale_set_link(
        &self,
        sale_id: Uuid,
        external_id: Option<Uuid>,
    ) -> Result<bool, SyncError> {
        let mut sales = self.sales.lock().unwrap();
        match sales.get_mut(&sale_id) {
            Some(sale) => {
                sale.external_id = external_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn sale_write_back(
        &self,
        sale_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, SyncError> {
        let mut sales = self.sales.lock().unwrap();
        match sales.get_mut(&sale_id) {
            Some(sale) => {
                sale.amount = amount;
                sale.sale_date = date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn sale_delete(&self, sale_id: Uuid) -> Result<bool, SyncError> {
        Ok(self.sales.lock().unwrap().remove(&sale_id).is_some())
    }

    async fn expense_set_link(
        &self,
        expense_id: Uuid,
        external_id: Option<Uuid>,
    ) -> Result<bool, SyncError> {
        let mut expenses = self.expenses.lock().unwrap();
        match expenses.get_mut(&expense_id) {
            Some(expense) => {
                expense.external_id = external_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn expense_write_back(
        &self,
        expense_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<bool, SyncError> {
        let mut expenses = self.expenses.lock().unwrap();
        match expenses.get_mut(&expense_id) {
            Some(expense) => {
                expense.amount = amount;
                expense.expense_date = date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn expense_delete(&self, expense_id: Uuid) -> Result<bool, SyncError> {
        Ok(self.expenses.lock().unwrap().remove(&expense_id).is_some())
    }
}

// Fixture builders

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_sale(user_id: Uuid, platform: &str, amount: i64) -> Sale {
    let now = Utc::now();
    Sale {
        id: Uuid::new_v4(),
        user_id,
        project_id: None,
        platform: platform.to_string(),
        amount: Decimal::from(amount),
        sale_date: date(2024, 1, 1),
        external_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_expense(
    user_id: Uuid,
    expense_type: ExpenseType,
    frequency: Option<Frequency>,
) -> Expense {
    let now = Utc::now();
    Expense {
        id: Uuid::new_v4(),
        user_id,
        project_id: None,
        category: "Infrastructure".to_string(),
        description: "Hosting".to_string(),
        amount: Decimal::from(25),
        expense_date: date(2024, 2, 15),
        expense_type,
        frequency,
        external_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn manual_transaction(
    user_id: Uuid,
    kind: TxnKind,
    external_id: Option<Uuid>,
) -> Transaction {
    let now = Utc::now();
    Transaction {
        id: Uuid::new_v4(),
        user_id,
        description: "Manual entry".to_string(),
        amount: Decimal::from(10),
        kind,
        txn_date: date(2024, 3, 1),
        category_id: Uuid::new_v4(),
        source: TxnSource::Manual,
        external_id,
        created_at: now,
        updated_at: now,
    }
}
