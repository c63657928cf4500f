//! The admin console: admin wallet, transfers, orders, menu and discount codes.

use crate::clients::ActorClient;
use crate::error::StorefrontError;
use crate::lifecycle::Services;
use crate::model::{
    Account, AccountId, DiscountCode, DiscountCreate, DiscountUpdate, EntryTags, Order, OrderId,
    OrderStatus, Product, ProductCreate, ProductId, ProductStatus, ProductUpdate, Rupees,
    WalletTransaction,
};
use crate::services::TransferReceipt;
use tracing::{info, instrument};

pub struct AdminConsole {
    services: Services,
    admin: Option<AccountId>,
}

impl AdminConsole {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            admin: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.admin.is_some()
    }

    fn require_admin(&self) -> Result<&AccountId, StorefrontError> {
        self.admin.as_ref().ok_or(StorefrontError::NotSignedIn)
    }

    /// Checks the configured admin credentials. Returns `false` on a mismatch.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<bool, StorefrontError> {
        let admin = &self.services.config.admin;
        if !email.trim().eq_ignore_ascii_case(&admin.email) || password != admin.password {
            info!("Admin sign-in rejected");
            return Ok(false);
        }
        let account = self.services.admins.require(&admin.id).await?;
        info!(admin = %account.id, "Admin signed in");
        self.admin = Some(account.id);
        Ok(true)
    }

    pub fn logout(&mut self) {
        self.admin = None;
    }

    pub async fn profile(&self) -> Result<Account, StorefrontError> {
        let id = self.require_admin()?;
        Ok(self.services.admins.require(id).await?)
    }

    // --- Wallet ---

    /// Moves `amount` from the admin wallet to `user_id`.
    ///
    /// Either both sides are recorded, or the error says exactly what happened
    /// (rejected, reversed, or partially applied).
    pub async fn try_transfer_to_user(
        &self,
        user_id: &AccountId,
        amount: Rupees,
        description: Option<&str>,
    ) -> Result<TransferReceipt, StorefrontError> {
        let admin = self.require_admin()?;
        Ok(self
            .services
            .transfers
            .try_transfer(admin, user_id, amount, description)
            .await?)
    }

    /// `true` when the transfer completed. Nothing changes on `false` unless the failure
    /// was logged as a partial transfer.
    pub async fn transfer_to_user(&self, user_id: &AccountId, amount: Rupees, description: Option<&str>) -> bool {
        match self.require_admin() {
            Ok(admin) => {
                self.services
                    .transfers
                    .transfer(admin, user_id, amount, description)
                    .await
            }
            Err(_) => false,
        }
    }

    pub async fn add_admin_funds(&self, amount: Rupees, description: &str) -> Result<WalletTransaction, StorefrontError> {
        let admin = self.require_admin()?.clone();
        Ok(self
            .services
            .admins
            .credit(admin, amount, description, EntryTags::default())
            .await?)
    }

    /// Most recent first; `None` uses the configured limit.
    pub async fn admin_transactions(&self, limit: Option<usize>) -> Result<Vec<WalletTransaction>, StorefrontError> {
        let admin = self.require_admin()?.clone();
        Ok(self.services.admins.history(admin, limit).await?)
    }

    // --- Users and orders ---

    /// Every user, newest account first.
    pub async fn list_users(&self) -> Result<Vec<Account>, StorefrontError> {
        self.require_admin()?;
        let mut users = self.services.users.list().await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.orders.all_orders().await?)
    }

    pub async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<OrderStatus, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.orders.set_status(id, status).await?)
    }

    // --- Menu ---

    pub async fn list_products(&self) -> Result<Vec<Product>, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.products.catalog().await?)
    }

    pub async fn add_product(&self, params: ProductCreate) -> Result<ProductId, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.products.add_product(params).await?)
    }

    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.products.update_product(id, update).await?)
    }

    pub async fn set_product_status(&self, id: ProductId, status: ProductStatus) -> Result<ProductStatus, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.products.set_status(id, status).await?)
    }

    pub async fn restock_product(&self, id: ProductId, quantity: u32) -> Result<u32, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.products.restock(id, quantity).await?)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), StorefrontError> {
        self.require_admin()?;
        Ok(self.services.products.delete(id).await?)
    }

    // --- Discount codes ---

    pub async fn list_discount_codes(&self) -> Result<Vec<DiscountCode>, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.discounts.codes().await?)
    }

    pub async fn add_discount_code(&self, params: DiscountCreate) -> Result<String, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.discounts.add_code(params).await?)
    }

    pub async fn update_discount_code(&self, code: &str, update: DiscountUpdate) -> Result<DiscountCode, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.discounts.update_code(code, update).await?)
    }

    /// Returns whether the code is active afterwards.
    pub async fn toggle_discount_code(&self, code: &str) -> Result<bool, StorefrontError> {
        self.require_admin()?;
        Ok(self.services.discounts.toggle(code).await?)
    }

    pub async fn delete_discount_code(&self, code: &str) -> Result<(), StorefrontError> {
        self.require_admin()?;
        Ok(self.services.discounts.remove_code(code).await?)
    }
}
