//! # KalingaMart demo
//!
//! Walks one storefront through a day's essentials:
//! 1. The admin signs in and tops up a customer's wallet (and is refused an overdraft).
//! 2. The customer fills a cart, applies `NEWUSER` and checks out.
//! 3. The status ticker carries the order to `delivered`.
//!
//! Configuration comes from `KALINGAMART_CONFIG` (a TOML file) and the
//! `KALINGAMART_BACKEND` / `KALINGAMART_DATA_DIR` overrides.

use actor_framework::tracing::setup_tracing;
use kalingamart::config::StorefrontConfig;
use kalingamart::lifecycle::Storefront;
use kalingamart::model::{Address, PaymentMethod, ProductCreate, Rupees};
use kalingamart::StorefrontError;
use std::path::PathBuf;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), StorefrontError> {
    setup_tracing();

    let config_path = std::env::var("KALINGAMART_CONFIG").ok().map(PathBuf::from);
    let mut config = StorefrontConfig::load(config_path.as_deref())?;
    // one status step every half second instead of every few seconds
    config.status_tick_millis = config.status_tick_millis.min(500);

    info!("Starting KalingaMart");
    let storefront = Storefront::open(config).await?;

    let mut shop = storefront.shop();
    let user = shop.login("asha@example.com", "secret").await?;
    info!(user = %user.id, balance = %user.wallet_balance, "Customer signed in");

    let mut admin = storefront.admin_console();
    let admin_email = storefront.config().admin.email.clone();
    let admin_password = storefront.config().admin.password.clone();
    if !admin.login(&admin_email, &admin_password).await? {
        return Err(StorefrontError::InvalidCredentials);
    }

    let span = tracing::info_span!("transfer");
    async {
        let ok = admin.transfer_to_user(&user.id, Rupees(1_000), None).await;
        info!(ok, "Transfer of ₹1000");

        match admin.try_transfer_to_user(&user.id, Rupees(60_000), None).await {
            Ok(_) => error!("Overdraft transfer was accepted"),
            Err(e) => info!(kind = %e.kind(), "{}", e.notice("Transfer")),
        }
    }
    .instrument(span)
    .await;

    let admin_profile = admin.profile().await?;
    info!(balance = %admin_profile.wallet_balance, "Admin wallet");

    let dosa = admin
        .add_product(ProductCreate {
            name: "Masala Dosa".to_string(),
            price: Rupees(75),
            category: "south-indian".to_string(),
            description: "Crisp dosa with potato masala".to_string(),
            image: None,
            stock: 40,
        })
        .await?;

    let span = tracing::info_span!("checkout");
    let order = async {
        shop.add_to_cart(dosa, 2).await?;
        shop.apply_discount("newuser").await?;
        let quote = shop.quote(false).await?;
        info!(
            subtotal = %quote.subtotal,
            delivery = %quote.delivery_fee,
            total = %quote.total,
            "Quote"
        );
        shop.checkout(
            Some(Address {
                street: "12 Janpath".to_string(),
                city: "Bhubaneswar".to_string(),
                state: "Odisha".to_string(),
                pincode: "751001".to_string(),
                country: "India".to_string(),
            }),
            PaymentMethod::CashOnDelivery,
            false,
        )
        .await
    }
    .instrument(span)
    .await?;
    info!(order = %order.id, total = %order.total, status = %order.status, "Order placed");

    match storefront.start_status_ticker(order.id.clone()).await {
        Ok(Ok(status)) => info!(order = %order.id, %status, "Order settled"),
        Ok(Err(e)) => error!(order = %order.id, error = %e, "Status updates failed"),
        Err(e) => error!(error = %e, "Status ticker panicked"),
    }

    for entry in shop.wallet_history(Some(5)).await? {
        info!(kind = ?entry.kind, amount = %entry.amount, "{}", entry.description);
    }

    storefront.shutdown().await;
    info!("Demo completed");
    Ok(())
}
