mod common;

use anyhow::Result;
use rust_decimal::Decimal;

use bizdash_api::database::models::{TxnKind, TxnSource};
use bizdash_api::services::sync::{SyncService, AFFILIATE_SALES_CATEGORY};
use common::{date, sample_sale, MemoryStore};
use uuid::Uuid;

#[tokio::test]
async fn first_sync_creates_linked_income_mirror() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "ClickBank", 120);
    service.store().seed_sale(sale.clone());

    let created = service.sync_sale(&sale, None).await?;
    let txn = created.expect("first sync should create a mirror");

    assert_eq!(txn.description, "ClickBank Sale");
    assert_eq!(txn.kind, TxnKind::Income);
    assert_eq!(txn.source, TxnSource::AffiliateHq);
    assert_eq!(txn.amount, Decimal::from(120));
    assert_eq!(txn.external_id, Some(sale.id));

    // The mirror id was written back onto the sale.
    let linked = service.store().sale(sale.id).unwrap();
    assert_eq!(linked.external_id, Some(txn.id));

    // The landing category was created lazily with the right kind.
    let category = service
        .store()
        .category_named(AFFILIATE_SALES_CATEGORY)
        .expect("sales category should exist after first sync");
    assert_eq!(category.kind, TxnKind::Income);
    assert_eq!(txn.category_id, category.id);
    Ok(())
}

#[tokio::test]
async fn second_sync_updates_mirror_in_place() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "Amazon", 50);
    service.store().seed_sale(sale.clone());
    service.sync_sale(&sale, None).await?;

    let mut edited = service.store().sale(sale.id).unwrap();
    edited.amount = Decimal::from(75);
    edited.sale_date = date(2024, 1, 20);

    let created = service.sync_sale(&edited, Some("My Blog")).await?;
    assert!(created.is_none(), "linked sale must not grow a second mirror");

    let transactions = service.store().all_transactions();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, Decimal::from(75));
    assert_eq!(transactions[0].txn_date, date(2024, 1, 20));
    assert_eq!(transactions[0].description, "Amazon - My Blog");
    Ok(())
}

#[tokio::test]
async fn repeated_syncs_are_last_write_wins() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    let sale = sample_sale(user_id, "Gumroad", 10);
    service.store().seed_sale(sale.clone());
    service.sync_sale(&sale, None).await?;

    for amount in [20i64, 30, 40] {
        let mut edited = service.store().sale(sale.id).unwrap();
        edited.amount = Decimal::from(amount);
        service.sync_sale(&edited, None).await?;
    }

    let transactions = service.store().all_transactions();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, Decimal::from(40));
    Ok(())
}

#[tokio::test]
async fn category_is_reused_across_sales() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    for platform in ["ClickBank", "Amazon", "ShareASale"] {
        let sale = sample_sale(user_id, platform, 5);
        service.store().seed_sale(sale.clone());
        service.sync_sale(&sale, None).await?;
    }

    let categories = service.store().categories.lock().unwrap().clone();
    assert_eq!(categories.len(), 1, "one shared landing category per user");
    Ok(())
}

#[tokio::test]
async fn stale_link_on_sale_is_tolerated() -> Result<()> {
    let store = MemoryStore::new();
    let service = SyncService::new(store);
    let user_id = Uuid::new_v4();

    // A sale pointing at a mirror that no longer exists: the sync is a
    // warn-and-continue no-op, not an error and not a fresh insert.
    let mut sale = sample_sale(user_id, "ClickBank", 15);
    sale.external_id = Some(Uuid::new_v4());
    service.store().seed_sale(sale.clone());

    let created = service.sync_sale(&sale, None).await?;
    assert!(created.is_none());
    assert!(service.store().all_transactions().is_empty());
    Ok(())
}
