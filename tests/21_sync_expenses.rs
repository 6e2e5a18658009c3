mod common;

use anyhow::Result;
use rust_decimal::Decimal;

use bizdash_api::database::models::{ExpenseType, Frequency, TxnKind, TxnSource};
use bizdash_api::services::sync::{SyncError, SyncService, SyncStore, AFFILIATE_EXPENSES_CATEGORY};
use common::{date, sample_expense, MemoryStore};
use uuid::Uuid;

#[tokio::test]
async fn one_time_expense_mirrors_into_transaction() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let expense = sample_expense(user_id, ExpenseType::OneTime, None);
    service.store().seed_expense(expense.clone());

    let created = service.sync_expense(&expense, None).await?;
    let txn = created.expect("first sync should create a mirror");

    assert_eq!(txn.description, "Hosting (Infrastructure)");
    assert_eq!(txn.kind, TxnKind::Expense);
    assert_eq!(txn.source, TxnSource::AffiliateHq);
    assert_eq!(txn.external_id, Some(expense.id));

    let linked = service.store().expense(expense.id).unwrap();
    assert_eq!(linked.external_id, Some(txn.id));

    let category = service
        .store()
        .category_named(AFFILIATE_EXPENSES_CATEGORY)
        .unwrap();
    assert_eq!(category.kind, TxnKind::Expense);
    Ok(())
}

#[tokio::test]
async fn recurring_expense_mirrors_into_recurring_transaction() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let expense = sample_expense(user_id, ExpenseType::Recurring, Some(Frequency::Monthly));
    service.store().seed_expense(expense.clone());

    let created = service
        .sync_expense_recurring(&expense, Some("My Blog"))
        .await?;
    let recurring = created.expect("first sync should create a recurring mirror");

    assert_eq!(recurring.description, "Hosting (Infrastructure) - My Blog");
    assert_eq!(recurring.frequency, Frequency::Monthly);
    assert_eq!(recurring.next_date, expense.expense_date);
    assert!(recurring.is_active);
    assert_eq!(recurring.source, TxnSource::AffiliateHq);
    assert_eq!(recurring.external_id, Some(expense.id));

    let linked = service.store().expense(expense.id).unwrap();
    assert_eq!(linked.external_id, Some(recurring.id));
    assert!(service.store().all_transactions().is_empty());
    Ok(())
}

#[tokio::test]
async fn recurring_sync_without_frequency_is_an_error() {
    let store = MemoryStore::new();
    let service = SyncService::new(store);

    let expense = sample_expense(Uuid::new_v4(), ExpenseType::Recurring, None);
    service.store().seed_expense(expense.clone());

    let err = service
        .sync_expense_recurring(&expense, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Store(_)));
}

#[tokio::test]
async fn type_change_replaces_mirror_kind() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let expense = sample_expense(user_id, ExpenseType::OneTime, None);
    service.store().seed_expense(expense.clone());
    let txn = service.sync_expense(&expense, None).await?.unwrap();

    // What the expense update handler does on a one-time -> recurring flip:
    // drop the old-kind mirror, clear the link, then sync under the new kind.
    service.delete_synced_transaction(txn.id).await;
    service.store().expense_set_link(expense.id, None).await?;

    let mut flipped = service.store().expense(expense.id).unwrap();
    flipped.expense_type = ExpenseType::Recurring;
    flipped.frequency = Some(Frequency::Weekly);

    let recurring = service
        .sync_expense_recurring(&flipped, None)
        .await?
        .expect("flip should create a fresh recurring mirror");

    assert!(service.store().all_transactions().is_empty());
    let all_recurring = service.store().all_recurring();
    assert_eq!(all_recurring.len(), 1);

    let relinked = service.store().expense(expense.id).unwrap();
    assert_eq!(relinked.external_id, Some(recurring.id));
    Ok(())
}

#[tokio::test]
async fn linked_recurring_expense_updates_in_place() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let expense = sample_expense(user_id, ExpenseType::Recurring, Some(Frequency::Monthly));
    service.store().seed_expense(expense.clone());
    service.sync_expense_recurring(&expense, None).await?;

    let mut edited = service.store().expense(expense.id).unwrap();
    edited.amount = Decimal::from(99);
    edited.expense_date = date(2024, 6, 1);
    edited.frequency = Some(Frequency::Yearly);

    let created = service.sync_expense_recurring(&edited, None).await?;
    assert!(created.is_none());

    let all_recurring = service.store().all_recurring();
    assert_eq!(all_recurring.len(), 1);
    assert_eq!(all_recurring[0].amount, Decimal::from(99));
    assert_eq!(all_recurring[0].next_date, date(2024, 6, 1));
    assert_eq!(all_recurring[0].frequency, Frequency::Yearly);
    Ok(())
}
