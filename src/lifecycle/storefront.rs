use crate::account_actor::{self, AccountContext};
use crate::clients::{AccountClient, ActorClient, DiscountClient, OrderClient, ProductClient};
use crate::config::StorefrontConfig;
use crate::discount_actor::{self, DiscountContext};
use crate::error::StorefrontError;
use crate::ids::{millis_suffix, MonotonicMillis};
use crate::lifecycle::{seed, spawn_status_ticker};
use crate::model::{AccountCreate, OrderId, OrderStatus, Role};
use crate::order_actor::{self, OrderContext, OrderError};
use crate::product_actor::{self, ProductContext};
use crate::services::{CheckoutService, TransferService};
use crate::session::{AdminConsole, ShopSession};
use crate::store::{self, LedgerStore, StoreHandle};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Everything a session needs, cheap to clone.
#[derive(Clone)]
pub struct Services {
    pub users: AccountClient,
    pub admins: AccountClient,
    pub orders: OrderClient,
    pub products: ProductClient,
    pub discounts: DiscountClient,
    pub checkout: CheckoutService,
    pub transfers: TransferService,
    pub store: StoreHandle,
    pub config: Arc<StorefrontConfig>,
    /// Millisecond suffixes for new user ids.
    pub account_clock: MonotonicMillis,
}

/// The running storefront: five actors plus the services built on them.
pub struct Storefront {
    services: Services,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Opens the configured backend and starts the storefront on it.
    pub async fn open(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let store = store::open(&config.backend).await?;
        Self::start(config, store).await
    }

    /// Starts the storefront on an already opened store.
    ///
    /// 1. Restore every collection (restores validate and reconcile).
    /// 2. Create the actors, seeded with the restored entities; id generators start past
    ///    the newest restored ids.
    /// 3. Spawn each actor with its context.
    /// 4. Open the admin account if it does not exist, then seed the default menu and
    ///    discount codes into empty collections.
    pub async fn start(config: StorefrontConfig, store: StoreHandle) -> Result<Self, StorefrontError> {
        config.validate()?;
        let config = Arc::new(config);
        let buffer = config.actor_buffer;

        let users = store.load_accounts(Role::User).await?;
        let admins = store.load_accounts(Role::Admin).await?;
        let orders = store.load_orders().await?;
        let products = store.load_products().await?;
        let codes = store.load_discount_codes().await?;
        info!(
            users = users.len(),
            admins = admins.len(),
            orders = orders.len(),
            products = products.len(),
            discount_codes = codes.len(),
            "State restored"
        );

        let newest_order = orders
            .iter()
            .filter_map(|o| millis_suffix(&o.id.0, OrderId::PREFIX))
            .max()
            .unwrap_or(0);
        let next_product = products.iter().map(|p| p.id.0 + 1).max().unwrap_or(1);
        let seed_menu = config.seed_defaults && products.is_empty();
        let seed_codes = config.seed_defaults && codes.is_empty();

        let (mut user_actor, user_client) = account_actor::new(buffer);
        user_actor.seed(users);
        let (mut admin_actor, admin_client) = account_actor::new(buffer);
        admin_actor.seed(admins);
        let (mut order_actor, order_client) =
            order_actor::new(buffer, MonotonicMillis::starting_after(newest_order));
        order_actor.seed(orders);
        let (mut product_actor, product_client) = product_actor::new(buffer, next_product);
        product_actor.seed(products);
        let (mut discount_actor, discount_client) = discount_actor::new(buffer);
        discount_actor.seed(codes);

        let account_context = AccountContext {
            store: store.clone(),
            history_limit: config.wallet.history_limit,
        };
        let handles = vec![
            tokio::spawn(user_actor.run(account_context.clone())),
            tokio::spawn(admin_actor.run(account_context)),
            tokio::spawn(order_actor.run(OrderContext { store: store.clone() })),
            tokio::spawn(product_actor.run(ProductContext { store: store.clone() })),
            tokio::spawn(discount_actor.run(DiscountContext { store: store.clone() })),
        ];

        let services = Services {
            checkout: CheckoutService::new(
                user_client.clone(),
                order_client.clone(),
                discount_client.clone(),
                config.pricing,
            ),
            transfers: TransferService::new(admin_client.clone(), user_client.clone()),
            users: user_client,
            admins: admin_client,
            orders: order_client,
            products: product_client,
            discounts: discount_client,
            store,
            config,
            account_clock: MonotonicMillis::default(),
        };
        let storefront = Self { services, handles };

        storefront.ensure_admin().await?;
        if seed_menu {
            seed::seed_menu(&storefront.services.products).await?;
        }
        if seed_codes {
            seed::seed_discount_codes(&storefront.services.discounts).await?;
        }
        info!("Storefront ready");
        Ok(storefront)
    }

    async fn ensure_admin(&self) -> Result<(), StorefrontError> {
        let admin = &self.services.config.admin;
        if self.services.admins.get(admin.id.clone()).await?.is_some() {
            return Ok(());
        }
        let mut params = AccountCreate::new(
            admin.id.clone(),
            Role::Admin,
            admin.name.as_str(),
            admin.email.as_str(),
        );
        if !admin.opening_balance.is_zero() {
            params = params.with_opening_credit(admin.opening_balance, "Initial admin wallet balance");
        }
        self.services.admins.open_account(params).await?;
        Ok(())
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.services.config
    }

    /// A new, signed-out customer session.
    pub fn shop(&self) -> ShopSession {
        ShopSession::new(self.services.clone())
    }

    /// A new, signed-out admin console.
    pub fn admin_console(&self) -> AdminConsole {
        AdminConsole::new(self.services.clone())
    }

    /// Drives `order_id` toward `delivered` at the configured tick interval.
    pub fn start_status_ticker(&self, order_id: OrderId) -> JoinHandle<Result<OrderStatus, OrderError>> {
        spawn_status_ticker(
            self.services.orders.clone(),
            order_id,
            self.services.config.status_tick(),
        )
    }

    /// Stops every actor and waits for its task. Returns the number of entities the
    /// actors held.
    ///
    /// Sessions still holding clients see `ActorCommunicationError` afterwards.
    pub async fn shutdown(self) -> usize {
        info!("Shutting down storefront...");
        let services = &self.services;
        let held = services.users.shutdown().await
            + services.admins.shutdown().await
            + services.orders.shutdown().await
            + services.products.shutdown().await
            + services.discounts.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
            }
        }
        info!(entities = held, "Storefront shutdown complete");
        held
    }
}
