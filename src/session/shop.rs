//! The customer session: sign-in, wallet, cart and checkout.

use crate::clients::ActorClient;
use crate::error::StorefrontError;
use crate::lifecycle::Services;
use crate::model::{
    Account, AccountCreate, AccountId, AccountUpdate, Address, AppliedDiscount, Cart,
    CartNotification, EntryTags, Order, OrderId, PaymentMethod, Product, ProductId, Role, Rupees,
    WalletTransaction,
};
use crate::pricing::Quote;
use crate::services::CheckoutRequest;
use crate::store::LedgerStore;
use chrono::Utc;
use tracing::{info, instrument, warn};

/// Avatar shown until the user uploads a picture.
fn default_avatar(email: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", email)
}

/// `"Asha  Das"` becomes `"asha_das"`.
fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

pub struct ShopSession {
    services: Services,
    user: Option<AccountId>,
    cart: Cart,
    discount: Option<AppliedDiscount>,
}

impl ShopSession {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            user: None,
            cart: Cart::default(),
            discount: None,
        }
    }

    pub fn user_id(&self) -> Option<&AccountId> {
        self.user.as_ref()
    }

    fn require_user(&self) -> Result<&AccountId, StorefrontError> {
        self.user.as_ref().ok_or(StorefrontError::NotSignedIn)
    }

    /// Signs in by email. Any non-empty password is accepted.
    ///
    /// A known email resumes that account; an unknown one opens a new account named after
    /// the email's local part, credited with the welcome bonus.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Account, StorefrontError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(StorefrontError::InvalidCredentials);
        }
        let account = match self.services.users.find_by_email(email).await? {
            Some(account) => account,
            None => {
                let local = email.split('@').next().unwrap_or(email);
                let id = AccountId(format!("{}_{}", local, self.services.account_clock.next()));
                self.open_user(AccountCreate::new(id, Role::User, local, email)).await?
            }
        };
        self.begin(&account).await?;
        Ok(account)
    }

    /// Registers a new account and signs it in.
    #[instrument(skip(self, password, confirm_password))]
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        phone: &str,
    ) -> Result<Account, StorefrontError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(StorefrontError::Validation("Please fill in all fields".into()));
        }
        if password != confirm_password {
            return Err(StorefrontError::Validation("Passwords do not match".into()));
        }
        if self.services.users.find_by_email(email).await?.is_some() {
            return Err(StorefrontError::Validation(format!(
                "An account with {} already exists",
                email
            )));
        }

        let id = AccountId(format!("{}_{}", slug(name), self.services.account_clock.next()));
        let mut params = AccountCreate::new(id, Role::User, name, email);
        params.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
        let account = self.open_user(params).await?;
        self.begin(&account).await?;
        Ok(account)
    }

    async fn open_user(&self, mut params: AccountCreate) -> Result<Account, StorefrontError> {
        params.profile_picture = Some(default_avatar(&params.email));
        params.address = Some(Address {
            country: "India".into(),
            ..Address::default()
        });
        let welcome_bonus = self.services.config.wallet.welcome_bonus;
        if !welcome_bonus.is_zero() {
            params = params.with_opening_credit(welcome_bonus, "Welcome bonus");
        }
        let id = self.services.users.open_account(params).await?;
        Ok(self.services.users.require(&id).await?)
    }

    /// Makes `account` the signed-in user and restores its saved cart. Items added
    /// before signing in are kept and saved under the account instead.
    async fn begin(&mut self, account: &Account) -> Result<(), StorefrontError> {
        if self.user.is_some() {
            self.logout();
        }
        if self.cart.is_empty() {
            let items = self.services.store.load_cart(&account.id).await?;
            self.cart = Cart::for_owner(account.id.clone(), items);
        } else {
            self.cart.owner = Some(account.id.clone());
            self.services.store.save_cart(&account.id, self.cart.items()).await?;
        }
        self.user = Some(account.id.clone());
        info!(user = %account.id, cart_lines = self.cart.items().len(), "Signed in");
        Ok(())
    }

    /// Ends the session. The account and its saved cart stay persisted.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(%user, "Signed out");
        }
        self.cart = Cart::default();
        self.discount = None;
    }

    /// The signed-in account as currently stored.
    pub async fn current_user(&self) -> Result<Account, StorefrontError> {
        let id = self.require_user()?;
        Ok(self.services.users.require(id).await?)
    }

    pub async fn update_profile(&self, update: AccountUpdate) -> Result<Account, StorefrontError> {
        let id = self.require_user()?.clone();
        Ok(self.services.users.update_profile(id, update).await?)
    }

    pub async fn wallet_balance(&self) -> Result<Rupees, StorefrontError> {
        Ok(self.current_user().await?.wallet_balance)
    }

    /// Tops up the signed-in user's wallet.
    pub async fn add_wallet_funds(
        &self,
        amount: Rupees,
        description: &str,
    ) -> Result<WalletTransaction, StorefrontError> {
        let id = self.require_user()?.clone();
        let description = match description.trim() {
            "" => "Wallet top-up",
            d => d,
        };
        Ok(self
            .services
            .users
            .credit(id, amount, description, EntryTags::default())
            .await?)
    }

    /// Most recent first; `None` uses the configured limit.
    pub async fn wallet_history(&self, limit: Option<usize>) -> Result<Vec<WalletTransaction>, StorefrontError> {
        let id = self.require_user()?.clone();
        Ok(self.services.users.history(id, limit).await?)
    }

    /// Active products.
    pub async fn menu(&self) -> Result<Vec<Product>, StorefrontError> {
        Ok(self.services.products.menu().await?)
    }

    // --- Cart ---

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_notification(&self) -> Option<&CartNotification> {
        self.cart.notification(Utc::now())
    }

    pub async fn add_to_cart(&mut self, product_id: ProductId, quantity: u32) -> Result<(), StorefrontError> {
        if quantity == 0 {
            return Err(StorefrontError::Validation("Quantity must be at least 1".into()));
        }
        let product = self.services.products.require(product_id).await?;
        if !product.is_active() {
            return Err(StorefrontError::Validation(format!(
                "{} is not available right now",
                product.name
            )));
        }
        self.cart
            .add(&product, quantity, Utc::now())
            .map_err(|e| StorefrontError::Validation(e.to_string()))?;
        self.save_cart().await
    }

    pub async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<bool, StorefrontError> {
        let removed = self.cart.remove(product_id);
        if removed {
            self.save_cart().await?;
        }
        Ok(removed)
    }

    /// Zero removes the line.
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<bool, StorefrontError> {
        let changed = self
            .cart
            .update_quantity(product_id, quantity)
            .map_err(|e| StorefrontError::Validation(e.to_string()))?;
        if changed {
            self.save_cart().await?;
        }
        Ok(changed)
    }

    pub async fn clear_cart(&mut self) -> Result<(), StorefrontError> {
        self.cart.clear();
        self.discount = None;
        self.save_cart().await
    }

    async fn save_cart(&self) -> Result<(), StorefrontError> {
        if let Some(owner) = &self.cart.owner {
            self.services.store.save_cart(owner, self.cart.items()).await?;
        }
        Ok(())
    }

    // --- Discount ---

    /// Applies `code` to this checkout, replacing any code applied before. Discounts
    /// never stack.
    pub async fn apply_discount(&mut self, code: &str) -> Result<AppliedDiscount, StorefrontError> {
        let applied = self.services.discounts.apply(code).await?;
        if let Some(previous) = self.discount.replace(applied.clone()) {
            if previous.code != applied.code {
                info!(from = %previous.code, to = %applied.code, "Discount code replaced");
            }
        }
        Ok(applied)
    }

    pub fn remove_discount(&mut self) -> Option<AppliedDiscount> {
        self.discount.take()
    }

    pub fn applied_discount(&self) -> Option<&AppliedDiscount> {
        self.discount.as_ref()
    }

    // --- Checkout ---

    fn checkout_request(
        &self,
        user_id: AccountId,
        address: Address,
        payment_method: PaymentMethod,
        use_wallet: bool,
    ) -> CheckoutRequest {
        CheckoutRequest {
            user_id,
            items: self.cart.items().to_vec(),
            address,
            payment_method,
            discount: self.discount.clone(),
            use_wallet,
        }
    }

    /// Prices the current cart without placing an order.
    pub async fn quote(&self, use_wallet: bool) -> Result<Quote, StorefrontError> {
        let user_id = self.require_user()?.clone();
        let request = self.checkout_request(user_id, Address::default(), PaymentMethod::CashOnDelivery, use_wallet);
        Ok(self.services.checkout.quote(&request).await?)
    }

    /// Places the order for the current cart.
    ///
    /// `address` defaults to the profile address. On success the cart and the applied
    /// discount are cleared.
    #[instrument(skip(self, address))]
    pub async fn checkout(
        &mut self,
        address: Option<Address>,
        payment_method: PaymentMethod,
        use_wallet: bool,
    ) -> Result<Order, StorefrontError> {
        let user = self.current_user().await?;
        let address = match address.or(user.address) {
            Some(address) => address,
            None => return Err(StorefrontError::Validation("Please add a delivery address".into())),
        };
        let request = self.checkout_request(user.id, address, payment_method, use_wallet);
        let order = self.services.checkout.place_order(request).await?;

        self.cart.clear();
        self.discount = None;
        if let Err(e) = self.save_cart().await {
            warn!(order = %order.id, error = %e, "Order placed but the saved cart was not cleared");
        }
        Ok(order)
    }

    /// The signed-in user's orders, newest first.
    pub async fn my_orders(&self) -> Result<Vec<Order>, StorefrontError> {
        let id = self.require_user()?;
        Ok(self.services.orders.orders_for_user(id).await?)
    }

    /// One of the signed-in user's orders.
    pub async fn order(&self, id: &OrderId) -> Result<Order, StorefrontError> {
        let user = self.require_user()?;
        match self.services.orders.get(id.clone()).await? {
            Some(order) if &order.user_id == user => Ok(order),
            _ => Err(crate::order_actor::OrderError::NotFound(id.clone()).into()),
        }
    }
}
