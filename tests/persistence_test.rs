use kalingamart::config::{Backend, StorefrontConfig};
use kalingamart::lifecycle::Storefront;
use kalingamart::model::{Address, PaymentMethod, ProductCreate, Rupees};
use kalingamart::services::TransferError;
use kalingamart::store::{MemoryDocumentDb, RemoteStore, StoreHandle};
use kalingamart::{ErrorKind, StorefrontError};
use std::path::Path;
use std::sync::Arc;

fn local_config(dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        backend: Backend::Local {
            data_dir: dir.to_path_buf(),
        },
        ..StorefrontConfig::default()
    }
}

fn address() -> Address {
    Address {
        street: "4 Station Road".into(),
        city: "Cuttack".into(),
        state: "Odisha".into(),
        pincode: "753001".into(),
        country: "India".into(),
    }
}

async fn remote_storefront() -> (Storefront, Arc<MemoryDocumentDb>) {
    let db = Arc::new(MemoryDocumentDb::new());
    let store: StoreHandle = Arc::new(RemoteStore::new(db.clone()));
    let storefront = Storefront::start(StorefrontConfig::default(), store)
        .await
        .expect("storefront should start");
    (storefront, db)
}

#[tokio::test]
async fn test_state_survives_restart_on_local_files() {
    let dir = tempfile::tempdir().unwrap();

    let (user_id, first_order) = {
        let storefront = Storefront::open(local_config(dir.path())).await.unwrap();
        let mut console = storefront.admin_console();
        assert!(console.login("admin@kalingamart.com", "admin123").await.unwrap());
        let idli = console
            .add_product(ProductCreate {
                name: "Idli Sambar".into(),
                price: Rupees(60),
                category: "breakfast".into(),
                description: String::new(),
                image: None,
                stock: 20,
            })
            .await
            .unwrap();

        let mut shop = storefront.shop();
        let user = shop.login("asha@example.com", "secret").await.unwrap();
        assert!(console.transfer_to_user(&user.id, Rupees(500), None).await);

        shop.add_to_cart(idli, 2).await.unwrap();
        shop.apply_discount("SAVE20").await.unwrap();
        let order = shop
            .checkout(Some(address()), PaymentMethod::CashOnDelivery, true)
            .await
            .unwrap();
        // 120 + 29 - 20, all of it from the wallet
        assert_eq!(order.wallet_used, Some(Rupees(129)));
        assert_eq!(order.total, Rupees::ZERO);

        // a cart left behind at shutdown
        shop.add_to_cart(idli, 1).await.unwrap();
        storefront.shutdown().await;
        (user.id, order.id)
    };

    assert!(dir.path().join("kalingamart-users.json").exists());
    assert!(dir.path().join("kalingamart-wallet-transactions.json").exists());

    let storefront = Storefront::open(local_config(dir.path())).await.unwrap();
    let mut console = storefront.admin_console();
    assert!(console.login("admin@kalingamart.com", "admin123").await.unwrap());

    // balances restored and reconciled with their ledgers
    let admin = console.profile().await.unwrap();
    assert_eq!(admin.wallet_balance, Rupees(49_500));
    assert_eq!(console.admin_transactions(None).await.unwrap().len(), 2);

    let mut shop = storefront.shop();
    let user = shop.login("asha@example.com", "secret").await.unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.wallet_balance, Rupees(50 + 500 - 129));
    assert_eq!(shop.wallet_history(None).await.unwrap().len(), 3);
    assert_eq!(shop.cart().item_count(), 1);

    // nothing reseeded, usage counted, order kept
    assert_eq!(console.list_products().await.unwrap().len(), 4);
    let codes = console.list_discount_codes().await.unwrap();
    assert_eq!(codes.len(), 4);
    assert_eq!(codes.iter().find(|c| c.code == "SAVE20").unwrap().usage_count, 1);
    let orders = shop.my_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, first_order);
    assert!(orders[0].totals_reconcile());

    // new ids never collide with restored ones
    let next = shop
        .checkout(Some(address()), PaymentMethod::CashOnDelivery, false)
        .await
        .unwrap();
    assert!(next.id > first_order);

    storefront.shutdown().await;
}

#[tokio::test]
async fn test_corrupt_slot_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("kalingamart-orders.json"), "{ not json").unwrap();

    let err = match Storefront::open(local_config(dir.path())).await {
        Ok(_) => panic!("corrupt orders slot should fail the restore"),
        Err(e) => e,
    };
    assert!(matches!(err, StorefrontError::Store(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_remote_store_writes_documents() {
    let (storefront, db) = remote_storefront().await;
    let mut shop = storefront.shop();
    shop.login("asha@example.com", "secret").await.unwrap();

    assert_eq!(db.count("admins").await, 1);
    assert_eq!(db.count("users").await, 1);
    assert_eq!(db.count("userTransactions").await, 1);
    assert_eq!(db.count("products").await, 3);
    assert_eq!(db.count("discountCodes").await, 4);

    let admin = db.document("admins", "admin_001").await.unwrap();
    assert_eq!(admin["walletBalance"], 50_000);

    storefront.shutdown().await;
}

#[tokio::test]
async fn test_failed_ledger_write_rolls_back_the_credit() {
    let (storefront, db) = remote_storefront().await;
    let mut shop = storefront.shop();
    shop.login("asha@example.com", "secret").await.unwrap();

    db.fail_next_writes("userTransactions", 1).await;
    let err = shop.add_wallet_funds(Rupees(100), "Top up").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteOperationFailed);
    let notice = err.notice("Add funds");
    assert!(notice.starts_with("Add funds failed"));
    assert!(notice.contains("try again"));
    assert_eq!(shop.wallet_balance().await.unwrap(), Rupees(50));

    // the account write fails after the entry was stored: the entry is withdrawn again
    db.fail_next_writes("users", 1).await;
    let err = shop.add_wallet_funds(Rupees(100), "Top up").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteOperationFailed);
    assert_eq!(shop.wallet_balance().await.unwrap(), Rupees(50));
    assert_eq!(db.count("userTransactions").await, 1);

    // the next attempt goes through
    shop.add_wallet_funds(Rupees(100), "Top up").await.unwrap();
    assert_eq!(shop.wallet_balance().await.unwrap(), Rupees(150));
    assert_eq!(db.count("userTransactions").await, 2);

    storefront.shutdown().await;
}

#[tokio::test]
async fn test_failed_user_credit_reverses_the_transfer() {
    let (storefront, db) = remote_storefront().await;
    let mut shop = storefront.shop();
    let user = shop.login("asha@example.com", "secret").await.unwrap();
    let mut console = storefront.admin_console();
    assert!(console.login("admin@kalingamart.com", "admin123").await.unwrap());

    db.fail_next_writes("userTransactions", 1).await;
    let err = console
        .try_transfer_to_user(&user.id, Rupees(1_000), None)
        .await
        .unwrap_err();

    assert!(matches!(err, StorefrontError::Transfer(TransferError::Reversed { .. })));
    assert_eq!(err.kind(), ErrorKind::RemoteOperationFailed);
    assert_eq!(console.profile().await.unwrap().wallet_balance, Rupees(50_000));
    assert_eq!(shop.wallet_balance().await.unwrap(), Rupees(50));

    let history = console.admin_transactions(None).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].description, "Reversal: Transfer to asha");

    storefront.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_database_fails_startup() {
    let db = Arc::new(MemoryDocumentDb::new());
    db.set_offline(true).await;
    let store: StoreHandle = Arc::new(RemoteStore::new(db));

    let err = match Storefront::start(StorefrontConfig::default(), store).await {
        Ok(_) => panic!("startup should fail while the database is offline"),
        Err(e) => e,
    };
    assert_eq!(err.kind(), ErrorKind::RemoteOperationFailed);
}
