mod common;

use anyhow::Result;
use rust_decimal::Decimal;

use bizdash_api::database::models::{ExpenseType, TxnKind, TxnSource};
use bizdash_api::services::sync::SyncService;
use common::{date, manual_transaction, sample_expense, sample_sale, MemoryStore};
use uuid::Uuid;

#[tokio::test]
async fn editing_mirror_pushes_fields_onto_sale() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "ClickBank", 40);
    service.store().seed_sale(sale.clone());
    service.sync_sale(&sale, None).await?;

    // The mirror carries source=affiliatehq; the reverse push only applies
    // to transactions whose source is something else. Rebuild the edit the
    // transaction update handler would see.
    let mut mirror = service.store().all_transactions().remove(0);
    mirror.source = TxnSource::Manual;
    mirror.amount = Decimal::from(65);
    mirror.txn_date = date(2024, 4, 2);

    service.push_transaction_fields(&mirror).await;

    let updated = service.store().sale(sale.id).unwrap();
    assert_eq!(updated.amount, Decimal::from(65));
    assert_eq!(updated.sale_date, date(2024, 4, 2));
    Ok(())
}

#[tokio::test]
async fn expense_kind_pushes_fields_onto_expense() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let expense = sample_expense(user_id, ExpenseType::OneTime, None);
    service.store().seed_expense(expense.clone());

    let mut txn = manual_transaction(user_id, TxnKind::Expense, Some(expense.id));
    txn.amount = Decimal::from(77);
    txn.txn_date = date(2024, 5, 9);

    service.push_transaction_fields(&txn).await;

    let updated = service.store().expense(expense.id).unwrap();
    assert_eq!(updated.amount, Decimal::from(77));
    assert_eq!(updated.expense_date, date(2024, 5, 9));
    Ok(())
}

#[tokio::test]
async fn affiliate_sourced_transactions_are_not_pushed_back() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "Amazon", 20);
    service.store().seed_sale(sale.clone());

    let mut txn = manual_transaction(user_id, TxnKind::Income, Some(sale.id));
    txn.source = TxnSource::AffiliateHq;
    txn.amount = Decimal::from(999);

    service.push_transaction_fields(&txn).await;

    let untouched = service.store().sale(sale.id).unwrap();
    assert_eq!(untouched.amount, Decimal::from(20));
    Ok(())
}

#[tokio::test]
async fn unlinked_transaction_is_ignored() {
    let store = MemoryStore::new();
    let service = SyncService::new(store);

    let txn = manual_transaction(Uuid::new_v4(), TxnKind::Income, None);
    service.push_transaction_fields(&txn).await;

    assert!(service.store().sales.lock().unwrap().is_empty());
}

#[tokio::test]
async fn dangling_external_id_is_tolerated() {
    let store = MemoryStore::new();
    let service = SyncService::new(store);

    // Points at a sale that no longer exists: warn-and-continue.
    let txn = manual_transaction(Uuid::new_v4(), TxnKind::Income, Some(Uuid::new_v4()));
    service.push_transaction_fields(&txn).await;
}

#[tokio::test]
async fn reverse_delete_removes_the_affiliate_row() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "ClickBank", 12);
    service.store().seed_sale(sale.clone());
    service.sync_sale(&sale, None).await?;

    // The transaction delete handler only makes this call when the deleted
    // row's source is affiliatehq; the kind routes it to the sales table.
    service
        .delete_synced_affiliate_entry(sale.id, TxnKind::Income)
        .await;

    assert!(service.store().sale(sale.id).is_none());
    Ok(())
}

#[tokio::test]
async fn manual_source_guard_protects_affiliate_rows() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "Amazon", 33);
    service.store().seed_sale(sale.clone());

    // A manually entered transaction that happens to carry a link. The
    // delete handler checks source before calling the reverse delete, so
    // removing this row never reaches the affiliate tables.
    let txn = manual_transaction(user_id, TxnKind::Income, Some(sale.id));
    service.store().seed_transaction(txn.clone());

    if txn.source == TxnSource::AffiliateHq {
        if let Some(affiliate_id) = txn.external_id {
            service
                .delete_synced_affiliate_entry(affiliate_id, txn.kind)
                .await;
        }
    }

    assert!(service.store().sale(sale.id).is_some());
    Ok(())
}
