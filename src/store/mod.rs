//! # Persistence
//!
//! Every actor persists through one object-safe interface, [`LedgerStore`], chosen at
//! composition time. The typed operations are written once, over the record-level
//! [`RecordStore`], and two adapters provide records:
//!
//! - [`LocalStore`]: named key-value slots, each holding a JSON array that is rewritten in
//!   full on every change ([`MemoryStorage`], [`FileStorage`]).
//! - [`RemoteStore`]: a document-per-record database ([`MemoryDocumentDb`]).
//!
//! Restores validate at the boundary: records decode into typed structs, ledger amounts
//! must be positive, balances must reconcile with their ledgers and order totals must
//! recompute. Anything else is [`StoreError::Corrupt`].

mod documents;
mod error;
mod local;
mod remote;

pub use documents::*;
pub use error::*;
pub use local::*;
pub use remote::*;

use crate::config::Backend;
use crate::model::{
    normalize_code, Account, AccountId, CartItem, DiscountCode, Order, Product, ProductId, Role,
    WalletTransaction,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared handle injected into every actor's context.
pub type StoreHandle = Arc<dyn LedgerStore>;

/// The persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Admins,
    UserTransactions,
    AdminTransactions,
    Orders,
    Products,
    DiscountCodes,
    Carts,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Users,
        Collection::Admins,
        Collection::UserTransactions,
        Collection::AdminTransactions,
        Collection::Orders,
        Collection::Products,
        Collection::DiscountCodes,
        Collection::Carts,
    ];

    pub fn accounts(role: Role) -> Self {
        match role {
            Role::User => Collection::Users,
            Role::Admin => Collection::Admins,
        }
    }

    pub fn transactions(role: Role) -> Self {
        match role {
            Role::User => Collection::UserTransactions,
            Role::Admin => Collection::AdminTransactions,
        }
    }

    /// Slot name in a [`KeyValueStorage`].
    pub fn local_key(self) -> &'static str {
        match self {
            Collection::Users => "kalingamart-users",
            Collection::Admins => "kalingamart-admin",
            Collection::UserTransactions => "kalingamart-wallet-transactions",
            Collection::AdminTransactions => "kalingamart-admin-transactions",
            Collection::Orders => "kalingamart-orders",
            Collection::Products => "kalingamart-products",
            Collection::DiscountCodes => "kalingamart-discount-codes",
            Collection::Carts => "kalingamart-cart",
        }
    }

    /// Collection name in a [`DocumentDatabase`].
    pub fn remote_name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Admins => "admins",
            Collection::UserTransactions => "userTransactions",
            Collection::AdminTransactions => "adminTransactions",
            Collection::Orders => "orders",
            Collection::Products => "products",
            Collection::DiscountCodes => "discountCodes",
            Collection::Carts => "carts",
        }
    }

    /// The record field that holds the record's key.
    pub fn key_field(self) -> &'static str {
        match self {
            Collection::DiscountCodes => "code",
            Collection::Carts => "owner",
            _ => "id",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.remote_name())
    }
}

/// Key of a raw record, reading string or numeric key fields.
pub fn record_key(collection: Collection, record: &Value) -> Option<String> {
    match record.get(collection.key_field())? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Record-level storage: whole collections in, single records out.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of `collection`, in insertion order.
    async fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Inserts or replaces the record stored under `key`.
    async fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError>;

    /// Removes the record under `key`; absent keys are not an error.
    async fn remove(&self, collection: Collection, key: &str) -> Result<(), StoreError>;
}

/// Typed persistence used by the actors.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Accounts of `role` with their ledgers attached and reconciled.
    async fn load_accounts(&self, role: Role) -> Result<Vec<Account>, StoreError>;
    async fn save_account(&self, account: &Account) -> Result<(), StoreError>;
    async fn remove_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Persists a new ledger entry and the account it changed.
    ///
    /// The entry is written first. If the account write then fails, the entry is removed
    /// again so no orphaned transaction survives.
    async fn commit_ledger_entry(
        &self,
        account: &Account,
        entry: &WalletTransaction,
    ) -> Result<(), StoreError>;

    async fn load_orders(&self) -> Result<Vec<Order>, StoreError>;
    async fn save_order(&self, order: &Order) -> Result<(), StoreError>;

    async fn load_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn save_product(&self, product: &Product) -> Result<(), StoreError>;
    async fn remove_product(&self, id: ProductId) -> Result<(), StoreError>;

    async fn load_discount_codes(&self) -> Result<Vec<DiscountCode>, StoreError>;
    async fn save_discount_code(&self, code: &DiscountCode) -> Result<(), StoreError>;
    async fn remove_discount_code(&self, code: &str) -> Result<(), StoreError>;

    async fn load_cart(&self, owner: &AccountId) -> Result<Vec<CartItem>, StoreError>;
    /// An empty cart removes the saved record.
    async fn save_cart(&self, owner: &AccountId, items: &[CartItem]) -> Result<(), StoreError>;
}

fn decode<T: DeserializeOwned>(collection: Collection, record: Value) -> Result<T, StoreError> {
    serde_json::from_value(record).map_err(|e| StoreError::corrupt(collection.to_string(), e.to_string()))
}

async fn load_typed<T, S>(store: &S, collection: Collection) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    store
        .load(collection)
        .await?
        .into_iter()
        .map(|record| decode(collection, record))
        .collect()
}

#[async_trait]
impl<S: RecordStore + ?Sized> LedgerStore for S {
    async fn load_accounts(&self, role: Role) -> Result<Vec<Account>, StoreError> {
        let accounts_collection = Collection::accounts(role);
        let ledger_collection = Collection::transactions(role);
        let mut accounts: Vec<Account> = load_typed(self, accounts_collection).await?;

        let mut entries = Vec::new();
        for document in load_typed::<TransactionDocument, _>(self, ledger_collection).await? {
            let entry = document
                .into_entry(role)
                .map_err(|reason| StoreError::corrupt(ledger_collection.to_string(), reason))?;
            entries.push(entry);
        }
        // stable: entries sharing a timestamp keep their stored order
        entries.sort_by_key(|e| e.timestamp);

        let mut ledgers: HashMap<AccountId, Vec<WalletTransaction>> = HashMap::new();
        for entry in entries {
            ledgers.entry(entry.owner.clone()).or_default().push(entry);
        }

        for account in &mut accounts {
            if account.role != role {
                return Err(StoreError::corrupt(
                    accounts_collection.to_string(),
                    format!("account {} has role {}", account.id, account.role),
                ));
            }
            account.ledger = ledgers.remove(&account.id).unwrap_or_default();
            account
                .reconcile()
                .map_err(|e| StoreError::corrupt(accounts_collection.to_string(), e.to_string()))?;
        }
        for (owner, orphaned) in ledgers {
            warn!(%owner, entries = orphaned.len(), "Ledger entries for unknown account ignored");
        }

        info!(%role, count = accounts.len(), "Accounts restored");
        Ok(accounts)
    }

    async fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        let record = serde_json::to_value(account)?;
        self.put(Collection::accounts(account.role), account.id.as_str(), record)
            .await
    }

    async fn remove_account(&self, account: &Account) -> Result<(), StoreError> {
        self.remove(Collection::accounts(account.role), account.id.as_str())
            .await
    }

    async fn commit_ledger_entry(
        &self,
        account: &Account,
        entry: &WalletTransaction,
    ) -> Result<(), StoreError> {
        let ledger_collection = Collection::transactions(account.role);
        let document = serde_json::to_value(TransactionDocument::from_entry(account.role, entry))?;
        self.put(ledger_collection, &entry.id, document).await?;

        if let Err(e) = self.save_account(account).await {
            if let Err(undo) = self.remove(ledger_collection, &entry.id).await {
                error!(txn = %entry.id, error = %undo, "Could not remove orphaned ledger entry");
            }
            return Err(e);
        }
        Ok(())
    }

    async fn load_orders(&self) -> Result<Vec<Order>, StoreError> {
        let orders: Vec<Order> = load_typed(self, Collection::Orders).await?;
        for order in &orders {
            if order.items.is_empty() || order.items.iter().any(|i| i.quantity == 0) {
                return Err(StoreError::corrupt(
                    Collection::Orders.to_string(),
                    format!("order {} has an empty or zero-quantity line", order.id),
                ));
            }
            if !order.totals_reconcile() {
                return Err(StoreError::corrupt(
                    Collection::Orders.to_string(),
                    format!("order {} total does not recompute", order.id),
                ));
            }
        }
        Ok(orders)
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        let record = serde_json::to_value(order)?;
        self.put(Collection::Orders, &order.id.0, record).await
    }

    async fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        let products: Vec<Product> = load_typed(self, Collection::Products).await?;
        if let Some(bad) = products.iter().find(|p| p.price.is_zero() || p.name.trim().is_empty()) {
            return Err(StoreError::corrupt(
                Collection::Products.to_string(),
                format!("product {} has no name or price", bad.id),
            ));
        }
        Ok(products)
    }

    async fn save_product(&self, product: &Product) -> Result<(), StoreError> {
        let record = serde_json::to_value(product)?;
        self.put(Collection::Products, &product.id.0.to_string(), record)
            .await
    }

    async fn remove_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.remove(Collection::Products, &id.0.to_string()).await
    }

    async fn load_discount_codes(&self) -> Result<Vec<DiscountCode>, StoreError> {
        let codes: Vec<DiscountCode> = load_typed(self, Collection::DiscountCodes).await?;
        if let Some(bad) = codes
            .iter()
            .find(|c| c.amount.is_zero() || c.code.is_empty() || normalize_code(&c.code) != c.code)
        {
            return Err(StoreError::corrupt(
                Collection::DiscountCodes.to_string(),
                format!("discount code '{}' is not normalized or has no amount", bad.code),
            ));
        }
        Ok(codes)
    }

    async fn save_discount_code(&self, code: &DiscountCode) -> Result<(), StoreError> {
        let record = serde_json::to_value(code)?;
        self.put(Collection::DiscountCodes, &code.code, record).await
    }

    async fn remove_discount_code(&self, code: &str) -> Result<(), StoreError> {
        self.remove(Collection::DiscountCodes, code).await
    }

    async fn load_cart(&self, owner: &AccountId) -> Result<Vec<CartItem>, StoreError> {
        let carts: Vec<CartRecord> = load_typed(self, Collection::Carts).await?;
        Ok(carts
            .into_iter()
            .find(|c| &c.owner == owner)
            .map(|c| c.items)
            .unwrap_or_default())
    }

    async fn save_cart(&self, owner: &AccountId, items: &[CartItem]) -> Result<(), StoreError> {
        if items.is_empty() {
            return self.remove(Collection::Carts, owner.as_str()).await;
        }
        let record = serde_json::to_value(CartRecord {
            owner: owner.clone(),
            items: items.to_vec(),
        })?;
        self.put(Collection::Carts, owner.as_str(), record).await
    }
}

/// Opens the store for the configured backend.
///
/// The remote backend is served by an in-process [`MemoryDocumentDb`]; embedders with a
/// real document database build a [`RemoteStore`] themselves.
pub async fn open(backend: &Backend) -> Result<StoreHandle, StoreError> {
    let store: StoreHandle = match backend {
        Backend::Memory => Arc::new(LocalStore::new(MemoryStorage::new())),
        Backend::Local { data_dir } => Arc::new(LocalStore::new(FileStorage::open(data_dir).await?)),
        Backend::Remote => Arc::new(RemoteStore::new(Arc::new(MemoryDocumentDb::new()))),
    };
    info!(?backend, "Store opened");
    Ok(store)
}
