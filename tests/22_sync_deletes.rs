mod common;

use anyhow::Result;

use bizdash_api::database::models::{ExpenseType, Frequency, TxnKind};
use bizdash_api::services::sync::{SyncService, SyncStore};
use common::{sample_expense, sample_sale, MemoryStore};
use uuid::Uuid;

#[tokio::test]
async fn deleting_linked_sale_removes_both_rows() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "ClickBank", 30);
    service.store().seed_sale(sale.clone());
    service.sync_sale(&sale, None).await?;

    // What the sale delete handler does: capture the link, delete the row,
    // then best-effort delete the mirror.
    let mirror_id = service.store().sale(sale.id).unwrap().external_id.unwrap();
    service.store().sale_delete(sale.id).await?;
    service.delete_synced_transaction(mirror_id).await;

    assert!(service.store().sale(sale.id).is_none());
    assert!(service.store().all_transactions().is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_unlinked_sale_leaves_transactions_alone() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    // An unrelated mirrored sale that must survive.
    let other = sample_sale(user_id, "Amazon", 10);
    service.store().seed_sale(other.clone());
    service.sync_sale(&other, None).await?;

    let unlinked = sample_sale(user_id, "Gumroad", 5);
    service.store().seed_sale(unlinked.clone());
    assert!(unlinked.external_id.is_none());

    // No link, so the handler deletes the row and does no mirror work.
    service.store().sale_delete(unlinked.id).await?;

    assert_eq!(service.store().all_transactions().len(), 1);
    Ok(())
}

#[tokio::test]
async fn deleting_linked_recurring_expense_removes_recurring_mirror() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let expense = sample_expense(user_id, ExpenseType::Recurring, Some(Frequency::Monthly));
    service.store().seed_expense(expense.clone());
    service.sync_expense_recurring(&expense, None).await?;

    let linked = service.store().expense(expense.id).unwrap();
    let mirror_id = linked.external_id.unwrap();

    // The handler routes the mirror delete by the expense's type.
    service.store().expense_delete(expense.id).await?;
    service.delete_synced_recurring(mirror_id).await;

    assert!(service.store().all_recurring().is_empty());
    Ok(())
}

#[tokio::test]
async fn mirror_delete_on_missing_row_is_swallowed() {
    let store = MemoryStore::new();
    let service = SyncService::new(store);

    // Already gone: both helpers are fire-and-forget and must not panic.
    service.delete_synced_transaction(Uuid::new_v4()).await;
    service.delete_synced_recurring(Uuid::new_v4()).await;
    service
        .delete_synced_affiliate_entry(Uuid::new_v4(), TxnKind::Income)
        .await;
}
