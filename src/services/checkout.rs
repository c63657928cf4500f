//! Turning a cart into a placed order.

use crate::account_actor::AccountError;
use crate::clients::{AccountClient, DiscountClient, OrderClient};
use crate::discount_actor::DiscountError;
use crate::model::{
    checked_subtotal_of, AccountId, Address, AppliedDiscount, CartItem, EntryTags, Order, OrderCreate,
    OrderId, PaymentMethod, Rupees,
};
use crate::order_actor::OrderError;
use crate::pricing::{PricingPolicy, Quote};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Delivery address is missing {0}")]
    IncompleteAddress(String),

    /// Wallet payment was chosen but the wallet does not cover the order.
    #[error("Wallet balance is short by {shortfall}")]
    WalletShortfall { shortfall: Rupees },

    #[error("Order total is too large")]
    TotalTooLarge,

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Order(#[from] OrderError),

    /// The order was created but the wallet debit failed; the order has been cancelled.
    #[error("Payment for order {order_id} failed: {source}")]
    PaymentFailed {
        order_id: OrderId,
        #[source]
        source: AccountError,
    },
}

/// Everything the shopper chose at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: AccountId,
    pub items: Vec<CartItem>,
    pub address: Address,
    pub payment_method: PaymentMethod,
    pub discount: Option<AppliedDiscount>,
    /// Pay part of the total from the wallet, whatever the payment method.
    pub use_wallet: bool,
}

#[derive(Clone, Debug)]
pub struct CheckoutService {
    users: AccountClient,
    orders: OrderClient,
    discounts: DiscountClient,
    pricing: PricingPolicy,
}

impl CheckoutService {
    pub fn new(users: AccountClient, orders: OrderClient, discounts: DiscountClient, pricing: PricingPolicy) -> Self {
        Self {
            users,
            orders,
            discounts,
            pricing,
        }
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// Prices a checkout without placing anything.
    ///
    /// The discount is re-checked against the discount actor, so a code switched off
    /// after it was applied no longer counts.
    pub async fn quote(&self, request: &CheckoutRequest) -> Result<Quote, CheckoutError> {
        let subtotal = checked_subtotal_of(&request.items)
            .filter(|s| s.checked_add(self.pricing.delivery_fee_for(*s)).is_some())
            .ok_or(CheckoutError::TotalTooLarge)?;
        let discount = match &request.discount {
            Some(applied) => Some(self.discounts.apply(&applied.code).await?),
            None => None,
        };
        let wallet_balance = if request.use_wallet || request.payment_method == PaymentMethod::Wallet {
            Some(self.users.balance(&request.user_id).await?)
        } else {
            None
        };
        Ok(Quote::compute(
            subtotal,
            &self.pricing,
            discount.as_ref(),
            wallet_balance,
        ))
    }

    /// Places the order, then pays the wallet share.
    ///
    /// Order: validate, quote, create the order (`pending`), debit the wallet
    /// (`Order payment - <id>`), count the discount usage. A failed debit cancels the
    /// order and is returned as [`CheckoutError::PaymentFailed`].
    #[instrument(skip(self, request), fields(user = %request.user_id, lines = request.items.len()))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        if request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let missing = request.address.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::IncompleteAddress(missing.join(", ")));
        }

        let quote = self.quote(&request).await?;
        if request.payment_method == PaymentMethod::Wallet && !quote.total.is_zero() {
            return Err(CheckoutError::WalletShortfall {
                shortfall: quote.total,
            });
        }

        let wallet_used = quote.wallet_used;
        let discount_code = quote.discount_code.clone();
        let order_id = self
            .orders
            .place_order(OrderCreate {
                user_id: request.user_id.clone(),
                items: request.items,
                quote,
                payment_method: request.payment_method,
                address: request.address,
            })
            .await?;

        if let Some(amount) = wallet_used {
            let payment = self
                .users
                .debit(
                    request.user_id.clone(),
                    amount,
                    format!("Order payment - {}", order_id),
                    EntryTags::order(order_id.clone()),
                )
                .await;
            if let Err(source) = payment {
                warn!(order = %order_id, error = %source, "Wallet payment failed, cancelling order");
                if let Err(e) = self.orders.cancel(order_id.clone()).await {
                    error!(order = %order_id, error = %e, "Could not cancel unpaid order");
                }
                return Err(CheckoutError::PaymentFailed { order_id, source });
            }
        }

        if let Some(code) = discount_code {
            if let Err(e) = self.discounts.record_usage(&code).await {
                warn!(%code, order = %order_id, error = %e, "Discount usage not recorded");
            }
        }

        let order = self.orders.require(&order_id).await?;
        info!(order = %order.id, total = %order.total, "Checkout complete");
        Ok(order)
    }
}
